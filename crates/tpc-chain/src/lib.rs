//! On-chain plumbing shared by shard and coordinator processes: turning a timeout into a block
//! height, querying that height, and driving a shard's escrow contract through its
//! lock/commit/reclaim lifecycle.

pub mod deadline;
pub mod error;
pub mod escrow;
pub mod oracle;
pub mod txid;

pub use deadline::DeadlineTracker;
pub use error::{
    ChainError,
    OnChainOp,
};
pub use escrow::{
    EscrowAdapter,
    EscrowStatus,
};
pub use oracle::{
    BlockHeightOracle,
    EthersBlockHeightOracle,
};
