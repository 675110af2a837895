use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::*;
use super::DatabaseError;

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Persistence boundary for every resource the API serves.
///
/// All user-owned operations take the caller's id and only ever read or write
/// that caller's rows. Lookups of another user's row behave as if it were absent.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // Tasks
    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;
    async fn create_task(&self, user_id: Uuid, task: NewTask) -> StoreResult<Task>;
    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: TaskPatch) -> StoreResult<Task>;
    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    // Journal
    async fn list_journal(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<JournalEntry>>;
    async fn create_journal(&self, user_id: Uuid, entry: NewJournalEntry) -> StoreResult<JournalEntry>;

    // Wellbeing
    async fn list_checkins(&self, user_id: Uuid, since: DateTime<Utc>) -> StoreResult<Vec<WellbeingCheckin>>;
    async fn create_checkin(&self, user_id: Uuid, checkin: NewCheckin) -> StoreResult<WellbeingCheckin>;

    // Study sessions
    async fn list_study_sessions(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<StudySession>>;
    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> StoreResult<StudySession>;

    // Lecturer feedback
    async fn list_feedback(&self, user_id: Uuid) -> StoreResult<Vec<LecturerFeedback>>;
    async fn create_feedback(&self, user_id: Uuid, feedback: NewFeedback) -> StoreResult<LecturerFeedback>;

    // Lectures
    async fn list_lectures(&self, user_id: Uuid) -> StoreResult<Vec<Lecture>>;
    async fn create_lecture(&self, user_id: Uuid, lecture: NewLecture) -> StoreResult<Lecture>;
    async fn set_lecture_status(&self, user_id: Uuid, id: Uuid, status: LectureStatus) -> StoreResult<Lecture>;

    // Transcripts
    async fn list_transcripts(
        &self,
        user_id: Uuid,
        filter: &TranscriptFilter,
    ) -> StoreResult<(Vec<Transcript>, i64)>;
    async fn create_transcript(&self, user_id: Uuid, transcript: NewTranscript) -> StoreResult<Transcript>;
    async fn update_transcript(&self, user_id: Uuid, id: Uuid, patch: TranscriptPatch) -> StoreResult<Transcript>;
    async fn delete_transcript(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    // Writing samples
    async fn list_writing_samples(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<WritingSample>>;
    async fn get_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<WritingSample>;
    async fn create_writing_sample(&self, user_id: Uuid, sample: NewWritingSample) -> StoreResult<WritingSample>;
    async fn update_writing_sample(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: WritingSamplePatch,
    ) -> StoreResult<WritingSample>;
    async fn delete_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    // AWY connections
    async fn list_awy_connections(&self, student_id: Uuid) -> StoreResult<Vec<AwyConnection>>;
    /// Insert unless the student already has `limit` connections or this email.
    /// The check and the insert are one atomic step; violations are `Conflict`.
    async fn create_awy_connection(
        &self,
        student_id: Uuid,
        connection: NewAwyConnection,
        limit: usize,
    ) -> StoreResult<AwyConnection>;

    // Subscriptions
    async fn get_subscription(&self, user_id: Uuid) -> StoreResult<Option<Subscription>>;
    async fn list_subscriptions(&self, limit: i64) -> StoreResult<Vec<Subscription>>;
    async fn upsert_subscription(&self, user_id: Uuid, update: SubscriptionUpdate) -> StoreResult<Subscription>;

    // Access requests (not user-scoped; reached through the public form and admin routes)
    async fn upsert_access_request(&self, request: NewAccessRequest) -> StoreResult<AccessRequest>;
    async fn get_access_request(&self, id: Uuid) -> StoreResult<Option<AccessRequest>>;
    async fn list_access_requests(&self, status: Option<AccessStatus>) -> StoreResult<Vec<AccessRequest>>;
    async fn approve_access_request(&self, id: Uuid, approval: AccessApproval) -> StoreResult<AccessRequest>;
}
