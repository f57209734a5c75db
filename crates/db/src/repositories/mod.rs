//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod affiliate_repo;
pub mod audit_repo;
pub mod equipment_repo;
pub mod lesson_repo;
pub mod maintenance_task_repo;
pub mod payment_event_repo;
pub mod question_repo;
pub mod quiz_attempt_repo;
pub mod quiz_repo;
pub mod referral_repo;
pub mod sponsor_placement_repo;
pub mod sponsor_repo;
pub mod srs_card_repo;
pub mod srs_deck_repo;
pub mod srs_review_repo;
pub mod track_repo;
pub mod use_log_repo;
pub mod user_repo;

pub use affiliate_repo::AffiliateRepo;
pub use audit_repo::AuditRepo;
pub use equipment_repo::EquipmentRepo;
pub use lesson_repo::LessonRepo;
pub use maintenance_task_repo::MaintenanceTaskRepo;
pub use payment_event_repo::PaymentEventRepo;
pub use question_repo::QuestionRepo;
pub use quiz_attempt_repo::QuizAttemptRepo;
pub use quiz_repo::QuizRepo;
pub use referral_repo::ReferralRepo;
pub use sponsor_placement_repo::SponsorPlacementRepo;
pub use sponsor_repo::SponsorRepo;
pub use srs_card_repo::SrsCardRepo;
pub use srs_deck_repo::SrsDeckRepo;
pub use srs_review_repo::SrsReviewRepo;
pub use track_repo::TrackRepo;
pub use use_log_repo::UseLogRepo;
pub use user_repo::UserRepo;
