use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::*;
use super::store::{Store, StoreResult};
use super::DatabaseError;

/// Postgres-backed store. Every user-owned statement carries `user_id = $1`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn found<T>(row: Option<T>, what: &str, id: Uuid) -> StoreResult<T> {
    row.ok_or_else(|| DatabaseError::not_found(what, id))
}

fn deleted(rows_affected: u64, what: &str, id: Uuid) -> StoreResult<()> {
    if rows_affected == 0 {
        return Err(DatabaseError::not_found(what, id));
    }
    Ok(())
}

/// `%needle%` with the LIKE metacharacters in `needle` escaped by `\`
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_transcript_conditions(builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &TranscriptFilter) {
    builder.push(" WHERE user_id = ").push_bind(user_id);
    if filter.pinned_only {
        builder.push(" AND is_pinned = TRUE");
    }
    if let Some(query) = &filter.query {
        let pattern = like_pattern(query);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR turns::text ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_tasks(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_task(&self, user_id: Uuid, task: NewTask) -> StoreResult<Task> {
        let row = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, user_id, title, status, due_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(task.title)
        .bind(TaskStatus::Open)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_task(&self, user_id: Uuid, id: Uuid, patch: TaskPatch) -> StoreResult<Task> {
        let row = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                title = COALESCE($3, title), \
                status = COALESCE($4, status), \
                due_date = CASE WHEN $5 THEN $6 ELSE due_date END \
             WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .bind(patch.title)
        .bind(patch.status)
        .bind(patch.due_date.is_some())
        .bind(patch.due_date.flatten())
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Task", id)
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Task", id)
    }

    async fn list_journal(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<JournalEntry>> {
        let rows = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_journal(&self, user_id: Uuid, entry: NewJournalEntry) -> StoreResult<JournalEntry> {
        let row = sqlx::query_as::<_, JournalEntry>(
            "INSERT INTO journal_entries (id, user_id, content, mood, tags, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.content)
        .bind(entry.mood)
        .bind(entry.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_checkins(&self, user_id: Uuid, since: DateTime<Utc>) -> StoreResult<Vec<WellbeingCheckin>> {
        let rows = sqlx::query_as::<_, WellbeingCheckin>(
            "SELECT * FROM wellbeing_checkins WHERE user_id = $1 AND created_at >= $2 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_checkin(&self, user_id: Uuid, checkin: NewCheckin) -> StoreResult<WellbeingCheckin> {
        let row = sqlx::query_as::<_, WellbeingCheckin>(
            "INSERT INTO wellbeing_checkins (id, user_id, score, stressors, note, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(checkin.score)
        .bind(checkin.stressors)
        .bind(checkin.note)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_study_sessions(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> StoreResult<Vec<StudySession>> {
        let rows = sqlx::query_as::<_, StudySession>(
            "SELECT * FROM study_sessions WHERE user_id = $1 AND started_at >= $2 \
             ORDER BY started_at DESC LIMIT $3",
        )
        .bind(user_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_study_session(&self, user_id: Uuid, session: NewStudySession) -> StoreResult<StudySession> {
        let row = sqlx::query_as::<_, StudySession>(
            "INSERT INTO study_sessions \
                (id, user_id, topic, duration_min, started_at, ended_at, difficulty, notes, tags, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(session.topic)
        .bind(session.duration_min)
        .bind(session.started_at)
        .bind(session.ended_at)
        .bind(session.difficulty)
        .bind(session.notes)
        .bind(session.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_feedback(&self, user_id: Uuid) -> StoreResult<Vec<LecturerFeedback>> {
        let rows = sqlx::query_as::<_, LecturerFeedback>(
            "SELECT * FROM lecturer_feedback WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_feedback(&self, user_id: Uuid, feedback: NewFeedback) -> StoreResult<LecturerFeedback> {
        let row = sqlx::query_as::<_, LecturerFeedback>(
            "INSERT INTO lecturer_feedback (id, user_id, module_code, lecturer_name, rating, comment, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(feedback.module_code)
        .bind(feedback.lecturer_name)
        .bind(feedback.rating)
        .bind(feedback.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_lectures(&self, user_id: Uuid) -> StoreResult<Vec<Lecture>> {
        let rows = sqlx::query_as::<_, Lecture>(
            "SELECT * FROM lectures WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_lecture(&self, user_id: Uuid, lecture: NewLecture) -> StoreResult<Lecture> {
        let row = sqlx::query_as::<_, Lecture>(
            "INSERT INTO lectures (id, user_id, title, module_code, lecturer_name, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(lecture.title)
        .bind(lecture.module_code)
        .bind(lecture.lecturer_name)
        .bind(LectureStatus::Uploaded)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_lecture_status(&self, user_id: Uuid, id: Uuid, status: LectureStatus) -> StoreResult<Lecture> {
        let row = sqlx::query_as::<_, Lecture>(
            "UPDATE lectures SET status = $3, updated_at = NOW() WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Lecture", id)
    }

    async fn list_transcripts(
        &self,
        user_id: Uuid,
        filter: &TranscriptFilter,
    ) -> StoreResult<(Vec<Transcript>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM transcripts");
        push_transcript_conditions(&mut count, user_id, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM transcripts");
        push_transcript_conditions(&mut select, user_id, filter);
        select.push(match filter.sort {
            TranscriptSort::Recent => " ORDER BY is_pinned DESC, created_at DESC",
            TranscriptSort::Oldest => " ORDER BY created_at ASC",
            TranscriptSort::Title => " ORDER BY title ASC",
        });
        select
            .push(" LIMIT ")
            .push_bind(filter.page_size)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows = select.build_query_as::<Transcript>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    async fn create_transcript(&self, user_id: Uuid, transcript: NewTranscript) -> StoreResult<Transcript> {
        let row = sqlx::query_as::<_, Transcript>(
            "INSERT INTO transcripts (id, user_id, title, turns, started_at, ended_at, is_pinned, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(transcript.title)
        .bind(Json(transcript.turns))
        .bind(transcript.started_at)
        .bind(transcript.ended_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_transcript(&self, user_id: Uuid, id: Uuid, patch: TranscriptPatch) -> StoreResult<Transcript> {
        let row = sqlx::query_as::<_, Transcript>(
            "UPDATE transcripts SET title = COALESCE($3, title), is_pinned = COALESCE($4, is_pinned) \
             WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .bind(patch.title)
        .bind(patch.is_pinned)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Transcript", id)
    }

    async fn delete_transcript(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM transcripts WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Transcript", id)
    }

    async fn list_writing_samples(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<WritingSample>> {
        let rows = sqlx::query_as::<_, WritingSample>(
            "SELECT * FROM writing_samples WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<WritingSample> {
        let row = sqlx::query_as::<_, WritingSample>(
            "SELECT * FROM writing_samples WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Writing sample", id)
    }

    async fn create_writing_sample(&self, user_id: Uuid, sample: NewWritingSample) -> StoreResult<WritingSample> {
        let row = sqlx::query_as::<_, WritingSample>(
            "INSERT INTO writing_samples \
                (id, user_id, title, content, context, word_count, is_ai_generated, confidence_score, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sample.title)
        .bind(sample.content)
        .bind(sample.context)
        .bind(sample.word_count)
        .bind(sample.is_ai_generated)
        .bind(sample.confidence_score)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_writing_sample(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: WritingSamplePatch,
    ) -> StoreResult<WritingSample> {
        let row = sqlx::query_as::<_, WritingSample>(
            "UPDATE writing_samples SET \
                title = COALESCE($3, title), \
                context = COALESCE($4, context), \
                confidence_score = COALESCE($5, confidence_score), \
                updated_at = NOW() \
             WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .bind(patch.title)
        .bind(patch.context)
        .bind(patch.confidence_score)
        .fetch_optional(&self.pool)
        .await?;
        found(row, "Writing sample", id)
    }

    async fn delete_writing_sample(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM writing_samples WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        deleted(result.rows_affected(), "Writing sample", id)
    }

    async fn list_awy_connections(&self, student_id: Uuid) -> StoreResult<Vec<AwyConnection>> {
        let rows = sqlx::query_as::<_, AwyConnection>(
            "SELECT * FROM awy_connections WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_awy_connection(
        &self,
        student_id: Uuid,
        connection: NewAwyConnection,
        limit: usize,
    ) -> StoreResult<AwyConnection> {
        let mut tx = self.pool.begin().await?;

        // Serialise inserts per student for the rest of the transaction
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(student_id.to_string())
            .execute(&mut *tx)
            .await?;

        let emails: Vec<String> =
            sqlx::query_scalar("SELECT lower(loved_email) FROM awy_connections WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(&mut *tx)
                .await?;
        if emails.len() >= limit {
            return Err(DatabaseError::Conflict(connection_limit_reached(limit)));
        }
        if emails.contains(&connection.loved_email.to_lowercase()) {
            return Err(DatabaseError::Conflict(ALREADY_CONNECTED.to_string()));
        }

        let row = sqlx::query_as::<_, AwyConnection>(
            "INSERT INTO awy_connections (id, student_id, loved_email, relationship, nickname, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(connection.loved_email)
        .bind(connection.relationship)
        .bind(connection.nickname)
        .bind(ConnectionStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn get_subscription(&self, user_id: Uuid) -> StoreResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_subscriptions(&self, limit: i64) -> StoreResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions ORDER BY updated_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_subscription(&self, user_id: Uuid, update: SubscriptionUpdate) -> StoreResult<Subscription> {
        let row = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (user_id, plan, status, trial_end_date, current_period_end, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET \
                plan = EXCLUDED.plan, \
                status = EXCLUDED.status, \
                trial_end_date = EXCLUDED.trial_end_date, \
                current_period_end = EXCLUDED.current_period_end, \
                updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(update.plan)
        .bind(update.status)
        .bind(update.trial_end_date)
        .bind(update.current_period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// A decided request (approved or rejected) keeps its status and trial on re-request;
    /// only a pending row, or an approved row being re-approved, takes the new values.
    async fn upsert_access_request(&self, request: NewAccessRequest) -> StoreResult<AccessRequest> {
        let row = sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests (id, email, name, status, trial_expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             ON CONFLICT (email) DO UPDATE SET \
                name = COALESCE(EXCLUDED.name, access_requests.name), \
                status = CASE WHEN access_requests.status = 'pending' \
                    OR (EXCLUDED.status = 'approved' AND access_requests.status = 'approved') \
                    THEN EXCLUDED.status ELSE access_requests.status END, \
                trial_expires_at = CASE WHEN access_requests.status = 'pending' \
                    OR (EXCLUDED.status = 'approved' AND access_requests.status = 'approved') \
                    THEN EXCLUDED.trial_expires_at ELSE access_requests.trial_expires_at END \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(request.email.to_lowercase())
        .bind(request.name)
        .bind(request.status)
        .bind(request.trial_expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_access_request(&self, id: Uuid) -> StoreResult<Option<AccessRequest>> {
        let row = sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_access_requests(&self, status: Option<AccessStatus>) -> StoreResult<Vec<AccessRequest>> {
        let rows = sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn approve_access_request(&self, id: Uuid, approval: AccessApproval) -> StoreResult<AccessRequest> {
        let row = sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = $2, invite_token = $3, trial_expires_at = $4, reviewed_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(AccessStatus::Approved)
        .bind(approval.invite_token)
        .bind(approval.trial_expires_at)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(row) = row {
            return Ok(row);
        }

        // Nothing updated: either the id is unknown or a concurrent review got there first
        match self.get_access_request(id).await? {
            Some(existing) => Err(DatabaseError::Conflict(already_decided(existing.status))),
            None => Err(DatabaseError::not_found("Access request", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("tort"), "%tort%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }
}
