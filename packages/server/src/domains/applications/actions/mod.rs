//! Job application actions

use tracing::info;

use crate::common::validation::{require_email, require_non_empty};
use crate::common::{DomainResult, JobApplicationId};
use crate::domains::applications::models::{
    ApplicationStatus, JobApplication, NewJobApplication,
};
use crate::domains::sync::MirrorCollection;
use crate::kernel::stores::ApplicationStore;
use crate::kernel::ServerDeps;

pub async fn submit_application(
    application: NewJobApplication,
    deps: &ServerDeps,
) -> DomainResult<JobApplication> {
    require_non_empty("position", &application.position)?;
    require_non_empty("name", &application.name)?;
    require_email(&application.email)?;
    require_non_empty("phone", &application.phone)?;

    let application = deps.store.insert_job_application(application).await?;
    info!(
        application_id = %application.id,
        position = %application.position,
        "job application received"
    );

    deps.sync_queue.enqueue(MirrorCollection::JobApplications);
    Ok(application)
}

pub async fn update_application_status(
    id: JobApplicationId,
    status: ApplicationStatus,
    notes: Option<String>,
    deps: &ServerDeps,
) -> DomainResult<JobApplication> {
    let application = deps
        .store
        .update_application_status(id, status, notes)
        .await?;
    info!(application_id = %id, status = %status, "application status updated");
    deps.sync_queue.enqueue(MirrorCollection::JobApplications);
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DomainError;
    use crate::kernel::TestDependencies;

    fn application() -> NewJobApplication {
        NewJobApplication {
            position: "Backend Engineer".into(),
            name: "Bo".into(),
            email: "bo@x.com".into(),
            phone: "555-0100".into(),
            cover_letter: "Hi".into(),
            resume_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_status_update_keeps_notes_unless_given() {
        let test = TestDependencies::new();
        let deps = test.server_deps();
        let app = submit_application(application(), &deps).await.unwrap();
        assert_eq!(app.status, ApplicationStatus::New);

        let app = update_application_status(
            app.id,
            ApplicationStatus::Reviewing,
            Some("strong".into()),
            &deps,
        )
        .await
        .unwrap();
        let app = update_application_status(app.id, ApplicationStatus::Interviewing, None, &deps)
            .await
            .unwrap();
        assert_eq!(app.status, ApplicationStatus::Interviewing);
        assert_eq!(app.notes.as_deref(), Some("strong"));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let test = TestDependencies::new();
        let mut input = application();
        input.email = "nope".into();
        let err = submit_application(input, &test.server_deps())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
