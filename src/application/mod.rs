pub mod classifier;
pub mod cookie_submission;
pub mod download_coordinator;
pub mod recovery;

pub use classifier::{FailureClassifier, SubstringClassifier};
pub use cookie_submission::{CookieSubmission, ScheduledReset, SelectOutcome, UploadRequest};
pub use download_coordinator::{DownloadCoordinator, SaveEvent};
pub use recovery::{DownloadAction, RecoveryFlow};
