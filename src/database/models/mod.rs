pub mod access_request;
pub mod awy;
pub mod feedback;
pub mod journal;
pub mod lecture;
pub mod study_session;
pub mod subscription;
pub mod task;
pub mod transcript;
pub mod wellbeing;
pub mod writing_sample;

pub use access_request::{already_decided, AccessApproval, AccessRequest, AccessStatus, NewAccessRequest};
pub use awy::{connection_limit_reached, AwyConnection, ConnectionStatus, NewAwyConnection, ALREADY_CONNECTED};
pub use feedback::{LecturerFeedback, NewFeedback};
pub use journal::{JournalEntry, NewJournalEntry};
pub use lecture::{Lecture, LectureStatus, NewLecture};
pub use study_session::{NewStudySession, StudySession};
pub use subscription::{Subscription, SubscriptionPlan, SubscriptionStatus, SubscriptionUpdate};
pub use task::{NewTask, Task, TaskPatch, TaskStatus};
pub use transcript::{
    NewTranscript, Transcript, TranscriptFilter, TranscriptPatch, TranscriptSort, TranscriptTurn, TurnRole,
    MAX_TRANSCRIPT_PAGE,
};
pub use wellbeing::{NewCheckin, WellbeingCheckin};
pub use writing_sample::{NewWritingSample, WritingSample, WritingSamplePatch};
