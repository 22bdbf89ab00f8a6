//! Proposal workflow for foundry-rules.
//!
//! [`Proposals`] binds a resolved config to an [`ActionDispatcher`] and
//! exposes the proposal lifecycle:
//!
//! ```ignore
//! let client = FoundryClient::from_connection(&config.foundry)?;
//! let proposals = Proposals::new(&config, &client);
//! let created = proposals.create(&input).await?;
//! ```
//!
//! Create and edit validate locally first and refuse to dispatch when any
//! stage reports an error.

pub mod dispatch;
pub mod error;
pub mod proposals;

pub use dispatch::ActionDispatcher;
pub use error::{Result, SdkError};
pub use proposals::{
    BulkRejectResult, CreateProposalResult, EditProposalInput, EditProposalResult, LogicSource,
    PreparedLogic, ProposalInput, ProposalValidation, Proposals, ReviewResult, prepare_logic,
    validate_proposal,
};
