//! Wire shape of `hapi.release.Release` (Helm v2).
//!
//! Only the fields the restore needs are declared. prost skips unknown tags,
//! so `info`, `chart`, `config` and `hooks` are ignored on decode.

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct ReleaseProto {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "5")]
    pub manifest: String,
    #[prost(int32, tag = "7")]
    pub version: i32,
    #[prost(string, tag = "8")]
    pub namespace: String,
}
