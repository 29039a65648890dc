pub mod codec;
pub mod sync;

pub use codec::MoveCodec;
pub use sync::{check_received, validate_target, Link, NetworkSync, Role};
