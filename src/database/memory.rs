use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::*;
use super::store::{Store, StoreResult};
use super::DatabaseError;

#[derive(Default)]
struct Tables {
    tasks: Vec<Task>,
    journal: Vec<JournalEntry>,
    checkins: Vec<WellbeingCheckin>,
    study_sessions: Vec<StudySession>,
    feedback: Vec<LecturerFeedback>,
    lectures: Vec<Lecture>,
    transcripts: Vec<Transcript>,
    writing_samples: Vec<WritingSample>,
    awy_connections: Vec<AwyConnection>,
    subscriptions: HashMap<Uuid, Subscription>,
    access_requests: Vec<AccessRequest>,
}

/// Process-local store used in development without `DATABASE_URL` and in tests.
/// Rows live in insertion order; each query sorts the way the Postgres store does.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(rows: &mut [T], created: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by(|a, b| created(b).cmp(&created(a)));
}

fn transcript_matches(transcript: &Transcript, needle: &str) -> bool {
    transcript.title.to_lowercase().contains(needle)
        || transcript
            .turns
            .iter()
            .any(|turn| turn.content.to_lowercase().contains(needle))
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Task> = tables.tasks.iter().filter(|t| t.user_id == user_id).cloned().collect();
        newest_first(&mut rows, |t| t.created_at);
        Ok(rows)
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> StoreResult<Task> {
        let row = Task {
            id: Uuid::new_v4(),
            user_id,
            title: task.title,
            status: TaskStatus::Open,
            due_date: task.due_date,
            created_at: Utc::now(),
        };
        self.tables.write().await.tasks.push(row.clone());
        Ok(row)
    }

    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: TaskPatch) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .ok_or_else(|| DatabaseError::not_found("Task", id))?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.user_id == user_id));
        if tables.tasks.len() == before {
            return Err(DatabaseError::not_found("Task", id));
        }
        Ok(())
    }

    async fn list_journal(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<JournalEntry>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<JournalEntry> = tables.journal.iter().filter(|e| e.user_id == user_id).cloned().collect();
        newest_first(&mut rows, |e| e.created_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn create_journal(&self, user_id: Uuid, entry: NewJournalEntry) -> StoreResult<JournalEntry> {
        let row = JournalEntry {
            id: Uuid::new_v4(),
            user_id,
            content: entry.content,
            mood: entry.mood,
            tags: entry.tags,
            created_at: Utc::now(),
        };
        self.tables.write().await.journal.push(row.clone());
        Ok(row)
    }

    async fn list_checkins(&self, user_id: Uuid, since: DateTime<Utc>) -> StoreResult<Vec<WellbeingCheckin>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WellbeingCheckin> = tables
            .checkins
            .iter()
            .filter(|c| c.user_id == user_id && c.created_at >= since)
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn create_checkin(&self, user_id: Uuid, checkin: NewCheckin) -> StoreResult<WellbeingCheckin> {
        let row = WellbeingCheckin {
            id: Uuid::new_v4(),
            user_id,
            score: checkin.score,
            stressors: checkin.stressors,
            note: checkin.note,
            created_at: Utc::now(),
        };
        self.tables.write().await.checkins.push(row.clone());
        Ok(row)
    }

    async fn list_study_sessions(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<StudySession>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<StudySession> = tables
            .study_sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.started_at >= since)
            .cloned()
            .collect();
        newest_first(&mut rows, |s| s.started_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> StoreResult<StudySession> {
        let row = StudySession {
            id: Uuid::new_v4(),
            user_id,
            topic: session.topic,
            duration_min: session.duration_min,
            started_at: session.started_at,
            ended_at: session.ended_at,
            difficulty: session.difficulty,
            notes: session.notes,
            tags: session.tags,
            created_at: Utc::now(),
        };
        self.tables.write().await.study_sessions.push(row.clone());
        Ok(row)
    }

    async fn list_feedback(&self, user_id: Uuid) -> StoreResult<Vec<LecturerFeedback>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<LecturerFeedback> = tables.feedback.iter().filter(|f| f.user_id == user_id).cloned().collect();
        newest_first(&mut rows, |f| f.created_at);
        Ok(rows)
    }

    async fn create_feedback(&self, user_id: Uuid, feedback: NewFeedback) -> StoreResult<LecturerFeedback> {
        let row = LecturerFeedback {
            id: Uuid::new_v4(),
            user_id,
            module_code: feedback.module_code,
            lecturer_name: feedback.lecturer_name,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: Utc::now(),
        };
        self.tables.write().await.feedback.push(row.clone());
        Ok(row)
    }

    async fn list_lectures(&self, user_id: Uuid) -> StoreResult<Vec<Lecture>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Lecture> = tables.lectures.iter().filter(|l| l.user_id == user_id).cloned().collect();
        newest_first(&mut rows, |l| l.created_at);
        Ok(rows)
    }

    async fn create_lecture(&self, user_id: Uuid, lecture: NewLecture) -> StoreResult<Lecture> {
        let now = Utc::now();
        let row = Lecture {
            id: Uuid::new_v4(),
            user_id,
            title: lecture.title,
            module_code: lecture.module_code,
            lecturer_name: lecture.lecturer_name,
            status: LectureStatus::Uploaded,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.lectures.push(row.clone());
        Ok(row)
    }

    async fn set_lecture_status(&self, user_id: Uuid, id: Uuid, status: LectureStatus) -> StoreResult<Lecture> {
        let mut tables = self.tables.write().await;
        let lecture = tables
            .lectures
            .iter_mut()
            .find(|l| l.id == id && l.user_id == user_id)
            .ok_or_else(|| DatabaseError::not_found("Lecture", id))?;
        lecture.status = status;
        lecture.updated_at = Utc::now();
        Ok(lecture.clone())
    }

    async fn list_transcripts(
        &self,
        user_id: Uuid,
        filter: &TranscriptFilter,
    ) -> StoreResult<(Vec<Transcript>, i64)> {
        let tables = self.tables.read().await;
        let needle = filter.query.as_ref().map(|q| q.to_lowercase());
        let mut rows: Vec<Transcript> = tables
            .transcripts
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| !filter.pinned_only || t.is_pinned)
            .filter(|t| needle.as_deref().map_or(true, |n| transcript_matches(t, n)))
            .cloned()
            .collect();

        match filter.sort {
            TranscriptSort::Recent => rows.sort_by(|a, b| {
                b.is_pinned
                    .cmp(&a.is_pinned)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
            TranscriptSort::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            TranscriptSort::Title => rows.sort_by(|a, b| a.title.cmp(&b.title)),
        }

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(filter.offset().max(0) as usize)
            .take(filter.page_size.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn create_transcript(&self, user_id: Uuid, transcript: NewTranscript) -> StoreResult<Transcript> {
        let row = Transcript {
            id: Uuid::new_v4(),
            user_id,
            title: transcript.title,
            turns: Json(transcript.turns),
            started_at: transcript.started_at,
            ended_at: transcript.ended_at,
            is_pinned: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.transcripts.push(row.clone());
        Ok(row)
    }

    async fn update_transcript(&self, user_id: Uuid, id: Uuid, patch: TranscriptPatch) -> StoreResult<Transcript> {
        let mut tables = self.tables.write().await;
        let transcript = tables
            .transcripts
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .ok_or_else(|| DatabaseError::not_found("Transcript", id))?;
        if let Some(title) = patch.title {
            transcript.title = title;
        }
        if let Some(pinned) = patch.is_pinned {
            transcript.is_pinned = pinned;
        }
        Ok(transcript.clone())
    }

    async fn delete_transcript(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.transcripts.len();
        tables.transcripts.retain(|t| !(t.id == id && t.user_id == user_id));
        if tables.transcripts.len() == before {
            return Err(DatabaseError::not_found("Transcript", id));
        }
        Ok(())
    }

    async fn list_writing_samples(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<WritingSample>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WritingSample> = tables
            .writing_samples
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |s| s.created_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn get_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<WritingSample> {
        let tables = self.tables.read().await;
        tables
            .writing_samples
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("Writing sample", id))
    }

    async fn create_writing_sample(&self, user_id: Uuid, sample: NewWritingSample) -> StoreResult<WritingSample> {
        let now = Utc::now();
        let row = WritingSample {
            id: Uuid::new_v4(),
            user_id,
            title: sample.title,
            content: sample.content,
            context: sample.context,
            word_count: sample.word_count,
            is_ai_generated: sample.is_ai_generated,
            confidence_score: sample.confidence_score,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.writing_samples.push(row.clone());
        Ok(row)
    }

    async fn update_writing_sample(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: WritingSamplePatch,
    ) -> StoreResult<WritingSample> {
        let mut tables = self.tables.write().await;
        let sample = tables
            .writing_samples
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id)
            .ok_or_else(|| DatabaseError::not_found("Writing sample", id))?;
        if let Some(title) = patch.title {
            sample.title = Some(title);
        }
        if let Some(context) = patch.context {
            sample.context = context;
        }
        if let Some(score) = patch.confidence_score {
            sample.confidence_score = score;
        }
        sample.updated_at = Utc::now();
        Ok(sample.clone())
    }

    async fn delete_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.writing_samples.len();
        tables.writing_samples.retain(|s| !(s.id == id && s.user_id == user_id));
        if tables.writing_samples.len() == before {
            return Err(DatabaseError::not_found("Writing sample", id));
        }
        Ok(())
    }

    async fn list_awy_connections(&self, student_id: Uuid) -> StoreResult<Vec<AwyConnection>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<AwyConnection> = tables
            .awy_connections
            .iter()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn create_awy_connection(
        &self,
        student_id: Uuid,
        connection: NewAwyConnection,
        limit: usize,
    ) -> StoreResult<AwyConnection> {
        let mut tables = self.tables.write().await;
        let existing: Vec<&AwyConnection> =
            tables.awy_connections.iter().filter(|c| c.student_id == student_id).collect();
        if existing.len() >= limit {
            return Err(DatabaseError::Conflict(connection_limit_reached(limit)));
        }
        if existing.iter().any(|c| c.loved_email.eq_ignore_ascii_case(&connection.loved_email)) {
            return Err(DatabaseError::Conflict(ALREADY_CONNECTED.to_string()));
        }

        let row = AwyConnection {
            id: Uuid::new_v4(),
            student_id,
            loved_email: connection.loved_email,
            relationship: connection.relationship,
            nickname: connection.nickname,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
        };
        tables.awy_connections.push(row.clone());
        Ok(row)
    }

    async fn get_subscription(&self, user_id: Uuid) -> StoreResult<Option<Subscription>> {
        Ok(self.tables.read().await.subscriptions.get(&user_id).cloned())
    }

    async fn list_subscriptions(&self, limit: i64) -> StoreResult<Vec<Subscription>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Subscription> = tables.subscriptions.values().cloned().collect();
        newest_first(&mut rows, |s| s.updated_at);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn upsert_subscription(&self, user_id: Uuid, update: SubscriptionUpdate) -> StoreResult<Subscription> {
        let row = Subscription {
            user_id,
            plan: update.plan,
            status: update.status,
            trial_end_date: update.trial_end_date,
            current_period_end: update.current_period_end,
            updated_at: Utc::now(),
        };
        self.tables.write().await.subscriptions.insert(user_id, row.clone());
        Ok(row)
    }

    async fn upsert_access_request(&self, request: NewAccessRequest) -> StoreResult<AccessRequest> {
        let mut tables = self.tables.write().await;
        let email = request.email.to_lowercase();
        if let Some(existing) = tables.access_requests.iter_mut().find(|r| r.email == email) {
            existing.name = request.name.or(existing.name.take());
            if existing.accepts_update(request.status) {
                existing.status = request.status;
                existing.trial_expires_at = request.trial_expires_at;
            }
            return Ok(existing.clone());
        }

        let row = AccessRequest {
            id: Uuid::new_v4(),
            email,
            name: request.name,
            status: request.status,
            invite_token: None,
            trial_expires_at: request.trial_expires_at,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        tables.access_requests.push(row.clone());
        Ok(row)
    }

    async fn get_access_request(&self, id: Uuid) -> StoreResult<Option<AccessRequest>> {
        let tables = self.tables.read().await;
        Ok(tables.access_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_access_requests(&self, status: Option<AccessStatus>) -> StoreResult<Vec<AccessRequest>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<AccessRequest> = tables
            .access_requests
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        Ok(rows)
    }

    async fn approve_access_request(&self, id: Uuid, approval: AccessApproval) -> StoreResult<AccessRequest> {
        let mut tables = self.tables.write().await;
        let request = tables
            .access_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DatabaseError::not_found("Access request", id))?;
        if request.status != AccessStatus::Pending {
            return Err(DatabaseError::Conflict(already_decided(request.status)));
        }
        request.status = AccessStatus::Approved;
        request.invite_token = Some(approval.invite_token);
        request.trial_expires_at = Some(approval.trial_expires_at);
        request.reviewed_at = Some(Utc::now());
        Ok(request.clone())
    }
}
