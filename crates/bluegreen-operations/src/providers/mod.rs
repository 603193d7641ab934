mod cf;

pub use cf::CfPlatform;
