//! Persistence and object-lifecycle core for the showbill catalog.
//! Unit of work, data mappers and relationship notification live here; web
//! routing and rendering stay outside.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod observer;
pub mod service;
pub mod uow;

pub use config::{CoreConfig, DbLocation};
pub use logging::{
    default_log_level, init_logging, logging_status, LogTarget, LoggerRegistry, NamedLogger,
};
pub use mapper::{
    Mapper, MapperError, MapperRegistry, MapperResult, PersonMapper, RecordMapper, WriteOp,
};
pub use model::category::{Category, CategoryError, CategoryId, CategoryTree, SharedCategory};
pub use model::domain_object::{DomainObject, ObjectKey, RecordId, SharedObject};
pub use model::person::{PersonOfInterest, SharedPerson, PERSON_OF_INTEREST_TAG};
pub use model::poster::{Poster, PosterKind, PosterSnapshot, SharedPoster};
pub use observer::{
    EmailNotifier, NotifyError, NotifyResult, Observer, ObserverList, SmsNotifier, Subject,
};
pub use service::showbill_service::{ServiceError, ServiceResult, ShowbillService};
pub use uow::{
    CommitError, CommitFailure, CommitSummary, EntityState, StagedAs, UnitOfWork, UowContext,
    UowError, UowResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
