#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod export;
pub mod preferences_service;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::{AppServices, LaunchOptions};
pub use catalog::{CatalogService, CatalogSource};
pub use error::{
    AppServicesError, CatalogError, ExportError, PreferencesServiceError, SessionError,
};
pub use export::{ExportDocument, ExportFormat};
pub use preferences_service::PreferencesService;

pub use sessions::{
    AdvanceTicket, LoadedCatalog, QuizLoopService, QuizSession, SessionAnswerResult,
    SessionEvent, SessionProgress, SessionState, SubmitOutcome,
};
