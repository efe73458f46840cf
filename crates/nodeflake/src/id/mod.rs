mod nodeflake;

pub use nodeflake::*;
