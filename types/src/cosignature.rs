//! Detached cosignature: the payload announced to
//! `PUT /transactions/cosignature`.

use serde::{Deserialize, Serialize};

use crate::serde_util::{u64_as_string, u64_lenient};
use crate::{PublicKey, Signature, TxHash};

/// A cosignature over an existing aggregate transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedCosignature {
    /// Hash of the aggregate transaction being cosigned.
    pub parent_hash: TxHash,
    pub signature: Signature,
    pub signer_public_key: PublicKey,
    /// Cosignature version; encoded as a decimal string (uint64 on the wire).
    #[serde(serialize_with = "u64_as_string", deserialize_with = "u64_lenient")]
    pub version: u64,
}
