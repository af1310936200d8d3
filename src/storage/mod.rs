pub mod codec;
pub mod persistence;

pub use codec::{Codec, JsonCodec, MessagePackCodec};
pub use persistence::PersistentStore;
