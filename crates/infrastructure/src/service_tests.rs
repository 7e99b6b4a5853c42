//! End-to-end use-case tests wiring the application services to the
//! in-memory adapters.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use taskboard_application::{
    AccessGroups, ActorDirectory, AuthOutcome, AuthorizationService, CommentScope, CommentService,
    CreateProjectInput, ProjectListQuery, ProjectService, RegisterParams, TaskFileService,
    TaskService, UploadedFile, UserRecord, UserRepository, UserService,
};
use taskboard_core::{AppError, Patch, UserIdentity};
use taskboard_domain::{
    GroupName, Project, ProjectField, ProjectPatch, TaskDraft, TaskField, TaskPatch, UserId,
    Username, WorkStatus,
};

use crate::{
    Argon2PasswordHasher, InMemoryBlobStore, InMemoryTrackerRepository, InMemoryUserRepository,
};

struct Fixture {
    users: Arc<InMemoryUserRepository>,
    blobs: Arc<InMemoryBlobStore>,
    user_service: UserService,
    projects: ProjectService,
    tasks: TaskService,
    comments: CommentService,
    files: TaskFileService,
}

impl Fixture {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let tracker = Arc::new(InMemoryTrackerRepository::new());
        let blobs = Arc::new(InMemoryBlobStore::new());

        let actors = ActorDirectory::new(users.clone());
        let authorization = AuthorizationService::new(AccessGroups {
            author_group: group("author"),
            commenter_group: group("author"),
        });

        Self {
            user_service: UserService::new(users.clone(), Arc::new(Argon2PasswordHasher::new())),
            projects: ProjectService::new(
                actors.clone(),
                authorization.clone(),
                tracker.clone(),
                tracker.clone(),
                tracker.clone(),
                blobs.clone(),
            ),
            tasks: TaskService::new(
                actors.clone(),
                authorization.clone(),
                tracker.clone(),
                tracker.clone(),
                tracker.clone(),
                tracker.clone(),
                blobs.clone(),
            ),
            comments: CommentService::new(
                actors.clone(),
                authorization.clone(),
                tracker.clone(),
                tracker.clone(),
                tracker.clone(),
            ),
            files: TaskFileService::new(
                actors,
                authorization,
                tracker.clone(),
                tracker.clone(),
                tracker,
                blobs.clone(),
            ),
            users,
            blobs,
        }
    }

    async fn user(&self, name: &str, groups: &[&str]) -> UserIdentity {
        let record = self
            .users
            .create(
                &Username::new(name).unwrap_or_else(|_| panic!("test")),
                "unused-hash",
            )
            .await
            .unwrap_or_else(|_| panic!("test"));
        let groups: Vec<GroupName> = groups.iter().map(|name| group(name)).collect();
        self.users
            .replace_groups(record.id, &groups)
            .await
            .unwrap_or_else(|_| panic!("test"));

        identity(&record)
    }

    async fn administrator(&self, name: &str) -> UserIdentity {
        let identity = self.user(name, &[]).await;
        self.users
            .set_administrator(user_id(&identity), true)
            .await
            .unwrap_or_else(|_| panic!("test"));
        identity
    }

    async fn project(&self, author: &UserIdentity, executor: &UserIdentity) -> Project {
        self.projects
            .create_project(author, project_input(Some(user_id(executor))))
            .await
            .unwrap_or_else(|error| panic!("failed to create test project: {error}"))
    }
}

fn group(name: &str) -> GroupName {
    GroupName::new(name).unwrap_or_else(|_| panic!("test"))
}

fn identity(record: &UserRecord) -> UserIdentity {
    UserIdentity::new(record.id.to_string(), record.username.clone())
}

fn user_id(identity: &UserIdentity) -> UserId {
    UserId::parse(identity.subject()).unwrap_or_else(|_| panic!("test"))
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap_or_else(|| panic!("test"))
}

fn project_input(executor: Option<UserId>) -> CreateProjectInput {
    CreateProjectInput {
        title: "Warehouse".to_owned(),
        description: "New roof".to_owned(),
        status: None,
        start_date: date(1),
        end_date: Some(date(30)),
        executor,
        comment: None,
    }
}

fn task_draft(number: i32) -> TaskDraft {
    TaskDraft {
        number,
        title: format!("Step {number}"),
        description: String::new(),
        status: WorkStatus::Open,
        start_date: date(2),
        end_date: date(9),
    }
}

#[tokio::test]
async fn executor_status_change_applies_and_mixed_patch_changes_nothing() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let project = fixture.project(&author, &executor).await;
    assert_eq!(project.status(), WorkStatus::Open);

    let updated = fixture
        .projects
        .update_project(
            &executor,
            project.id(),
            ProjectPatch {
                status: Patch::Present(WorkStatus::Done),
                ..ProjectPatch::default()
            },
        )
        .await
        .unwrap_or_else(|error| panic!("status update failed: {error}"));
    assert_eq!(updated.status(), WorkStatus::Done);

    let denied = fixture
        .projects
        .update_project(
            &executor,
            project.id(),
            ProjectPatch {
                status: Patch::Present(WorkStatus::InProgress),
                title: Patch::Present("x".to_owned()),
                ..ProjectPatch::default()
            },
        )
        .await;
    match denied {
        Err(AppError::DisallowedFields(fields)) => assert_eq!(fields, vec!["title".to_owned()]),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let stored = fixture
        .projects
        .get_project(project.id())
        .await
        .unwrap_or_else(|_| panic!("test"))
        .project;
    assert_eq!(stored.status(), WorkStatus::Done);
    assert_eq!(stored.title(), "Warehouse");
    assert_eq!(stored.version(), updated.version());
}

#[tokio::test]
async fn users_outside_author_group_cannot_create_projects() {
    let fixture = Fixture::new();
    let outsider = fixture.user("olga", &["reviewer"]).await;
    let executor = fixture.user("erik", &[]).await;

    let created = fixture
        .projects
        .create_project(&outsider, project_input(Some(user_id(&executor))))
        .await;
    assert!(matches!(created, Err(AppError::Forbidden(_))));

    let listed = fixture
        .projects
        .list_projects(&ProjectListQuery::default())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(listed.is_empty());
}

#[tokio::test]
async fn project_creation_requires_an_existing_executor() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;

    let missing = fixture
        .projects
        .create_project(&author, project_input(None))
        .await;
    assert!(matches!(missing, Err(AppError::Validation(_))));

    let unknown = fixture
        .projects
        .create_project(&author, project_input(Some(UserId::new())))
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn schedule_violations_are_rejected_for_unrestricted_roles() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let stranger = fixture.user("sven", &[]).await;
    let admin = fixture.administrator("root").await;
    let project = fixture.project(&author, &executor).await;
    let bad_end_date = || ProjectPatch {
        end_date: Patch::Present(Some(NaiveDate::MIN)),
        ..ProjectPatch::default()
    };

    for caller in [&author, &admin] {
        let result = fixture
            .projects
            .update_project(caller, project.id(), bad_end_date())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    // Roles without access to the field are denied before the value is checked.
    for caller in [&executor, &stranger] {
        let result = fixture
            .projects
            .update_project(caller, project.id(), bad_end_date())
            .await;
        match result {
            Err(AppError::DisallowedFields(fields)) => {
                assert_eq!(fields, vec!["end_date".to_owned()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    let stored = fixture
        .projects
        .get_project(project.id())
        .await
        .unwrap_or_else(|_| panic!("test"))
        .project;
    assert_eq!(stored.version(), project.version());

    let mut input = project_input(Some(user_id(&executor)));
    input.end_date = Some(date(1) - chrono::Duration::days(1));
    let created = fixture.projects.create_project(&author, input).await;
    assert!(matches!(created, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn project_author_cannot_edit_the_executor_comment() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let project = fixture.project(&author, &executor).await;
    let scope = CommentScope::Project(project.id());

    let comment = fixture
        .comments
        .create_comment(&executor, scope, "half done".to_owned())
        .await
        .unwrap_or_else(|error| panic!("comment failed: {error}"));

    let edited = fixture
        .comments
        .update_comment(&author, scope, comment.id(), "rewritten".to_owned())
        .await;
    assert!(matches!(edited, Err(AppError::Forbidden(_))));

    let deleted = fixture
        .comments
        .delete_comment(&author, scope, comment.id())
        .await;
    assert!(matches!(deleted, Err(AppError::Forbidden(_))));

    let own_edit = fixture
        .comments
        .update_comment(&executor, scope, comment.id(), "all done".to_owned())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(own_edit.text(), "all done");

    let details = fixture
        .projects
        .get_project(project.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(details.comments.len(), 1);
    assert_eq!(details.comments[0].text(), "all done");
}

#[tokio::test]
async fn project_author_moderates_other_comments_on_tasks() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let colleague = fixture.user("carl", &["author"]).await;
    let stranger = fixture.user("sven", &[]).await;
    let project = fixture.project(&author, &executor).await;
    let task = fixture
        .tasks
        .create_task(&author, project.id(), task_draft(1))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let scope = CommentScope::Task {
        project_id: project.id(),
        task_id: task.id(),
    };

    let refused = fixture
        .comments
        .create_comment(&stranger, scope, "hello".to_owned())
        .await;
    assert!(matches!(refused, Err(AppError::Forbidden(_))));

    let comment = fixture
        .comments
        .create_comment(&colleague, scope, "needs a second coat".to_owned())
        .await
        .unwrap_or_else(|_| panic!("test"));

    let moderated = fixture
        .comments
        .delete_comment(&author, scope, comment.id())
        .await;
    assert!(moderated.is_ok());

    let remaining = fixture
        .comments
        .list_comments(scope)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn task_updates_follow_the_field_policy() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let project = fixture.project(&author, &executor).await;

    let by_executor = fixture
        .tasks
        .create_task(&executor, project.id(), task_draft(1))
        .await;
    assert!(matches!(by_executor, Err(AppError::Forbidden(_))));

    let task = fixture
        .tasks
        .create_task(&author, project.id(), task_draft(1))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let started = fixture
        .tasks
        .update_task(
            &executor,
            project.id(),
            task.id(),
            TaskPatch {
                status: Patch::Present(WorkStatus::InProgress),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(started.status(), WorkStatus::InProgress);

    let renumbered = fixture
        .tasks
        .update_task(
            &executor,
            project.id(),
            task.id(),
            TaskPatch {
                number: Patch::Present(7),
                ..TaskPatch::default()
            },
        )
        .await;
    assert!(matches!(renumbered, Err(AppError::DisallowedFields(_))));

    let details = fixture
        .tasks
        .get_task(project.id(), task.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(details.task.number(), 1);
    assert_eq!(details.project_title, "Warehouse");
}

#[tokio::test]
async fn empty_patch_returns_the_stored_project() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let stranger = fixture.user("sven", &[]).await;
    let project = fixture.project(&author, &executor).await;

    let untouched = fixture
        .projects
        .update_project(&stranger, project.id(), ProjectPatch::default())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(untouched, project);
}

#[tokio::test]
async fn missing_entities_are_reported_before_permissions() {
    let fixture = Fixture::new();
    let stranger = fixture.user("sven", &[]).await;

    let update = fixture
        .projects
        .update_project(
            &stranger,
            taskboard_domain::ProjectId::new(),
            ProjectPatch {
                title: Patch::Present("x".to_owned()),
                ..ProjectPatch::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn attachments_are_stored_and_cleaned_up() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let stranger = fixture.user("sven", &["author"]).await;
    let project = fixture.project(&author, &executor).await;
    let task = fixture
        .tasks
        .create_task(&author, project.id(), task_draft(1))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let missing = fixture
        .files
        .upload_task_file(&executor, project.id(), task.id(), None)
        .await;
    assert!(matches!(missing, Err(AppError::MissingAttachment(_))));

    let upload = || UploadedFile {
        filename: "site.jpg".to_owned(),
        bytes: vec![1, 2, 3],
    };
    let refused = fixture
        .files
        .upload_task_file(&stranger, project.id(), task.id(), Some(upload()))
        .await;
    assert!(matches!(refused, Err(AppError::Forbidden(_))));
    assert!(fixture.blobs.is_empty().await);

    let task_file = fixture
        .files
        .upload_task_file(&executor, project.id(), task.id(), Some(upload()))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let download = fixture
        .files
        .download_task_file(project.id(), task.id(), task_file.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(download.bytes, vec![1, 2, 3]);
    assert_eq!(download.task_file.filename(), "site.jpg");

    let removal = fixture
        .files
        .delete_task_file(&stranger, project.id(), task.id(), task_file.id())
        .await;
    assert!(matches!(removal, Err(AppError::Forbidden(_))));

    assert!(
        fixture
            .projects
            .delete_project(&author, project.id())
            .await
            .is_ok()
    );
    assert!(fixture.blobs.is_empty().await);

    let gone = fixture.tasks.get_task(project.id(), task.id()).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn only_the_author_or_administrator_deletes_projects() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let admin = fixture.administrator("root").await;
    let project = fixture.project(&author, &executor).await;

    let by_executor = fixture
        .projects
        .delete_project(&executor, project.id())
        .await;
    assert!(matches!(by_executor, Err(AppError::Forbidden(_))));

    let by_admin = fixture.projects.delete_project(&admin, project.id()).await;
    assert!(by_admin.is_ok());
}

#[tokio::test]
async fn registration_login_and_group_administration() {
    let fixture = Fixture::new();

    let registered = fixture
        .user_service
        .register(RegisterParams {
            username: "maria".to_owned(),
            password: "quiet-meadow-42".to_owned(),
        })
        .await
        .unwrap_or_else(|error| panic!("registration failed: {error}"));

    let duplicate = fixture
        .user_service
        .register(RegisterParams {
            username: "maria".to_owned(),
            password: "quiet-meadow-42".to_owned(),
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let outcome = fixture
        .user_service
        .login("maria", "quiet-meadow-42")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(matches!(outcome, AuthOutcome::Authenticated(ref user) if user.id == registered.id));

    let wrong = fixture
        .user_service
        .login("maria", "loud-meadow-42")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(matches!(wrong, AuthOutcome::Failed));

    let actors = ActorDirectory::new(fixture.users.clone());
    let maria = actors
        .resolve(&identity(&registered))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let refused = fixture
        .user_service
        .replace_groups(&maria, registered.id, vec!["author".to_owned()])
        .await;
    assert!(matches!(refused, Err(AppError::Forbidden(_))));

    let promoted = fixture
        .user_service
        .bootstrap_administrator(registered.id, "s3cret", "s3cret")
        .await;
    assert!(promoted.is_ok());

    let maria = actors
        .resolve(&identity(&registered))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let groups = fixture
        .user_service
        .replace_groups(
            &maria,
            registered.id,
            vec!["author".to_owned(), "author".to_owned()],
        )
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(groups, vec![group("author")]);
}

#[tokio::test]
async fn bootstrap_promotes_only_with_the_configured_token() {
    let fixture = Fixture::new();
    let caller = fixture.user("noor", &[]).await;
    let caller_id = user_id(&caller);

    for presented in ["s3cres", "s3cret-and-more", ""] {
        let rejected = fixture
            .user_service
            .bootstrap_administrator(caller_id, "s3cret", presented)
            .await;
        assert!(matches!(rejected, Err(AppError::Unauthorized(_))));
    }

    let unconfigured = fixture
        .user_service
        .bootstrap_administrator(caller_id, "", "")
        .await;
    assert!(matches!(unconfigured, Err(AppError::Unauthorized(_))));

    let stored = fixture
        .users
        .find_by_id(caller_id)
        .await
        .unwrap_or_else(|_| panic!("test"))
        .unwrap_or_else(|| panic!("test"));
    assert!(!stored.is_administrator);

    fixture
        .user_service
        .bootstrap_administrator(caller_id, "s3cret", "s3cret")
        .await
        .unwrap_or_else(|error| panic!("bootstrap failed: {error}"));

    let stored = fixture
        .users
        .find_by_id(caller_id)
        .await
        .unwrap_or_else(|_| panic!("test"))
        .unwrap_or_else(|| panic!("test"));
    assert!(stored.is_administrator);
}

#[tokio::test]
async fn submitted_field_names_are_checked_before_values() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let stranger = fixture.user("sven", &[]).await;
    let project = fixture.project(&author, &executor).await;
    let task = fixture
        .tasks
        .create_task(&author, project.id(), task_draft(1))
        .await
        .unwrap_or_else(|_| panic!("test"));

    let status_and_title = BTreeSet::from([ProjectField::Status, ProjectField::Title]);
    match fixture
        .projects
        .check_project_update(&executor, project.id(), &status_and_title)
        .await
    {
        Err(AppError::DisallowedFields(fields)) => assert_eq!(fields, vec!["title".to_owned()]),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(
        fixture
            .projects
            .check_project_update(&author, project.id(), &status_and_title)
            .await
            .is_ok()
    );

    let status_only = BTreeSet::from([TaskField::Status]);
    assert!(
        fixture
            .tasks
            .check_task_update(&executor, project.id(), task.id(), &status_only)
            .await
            .is_ok()
    );
    let refused = fixture
        .tasks
        .check_task_update(&stranger, project.id(), task.id(), &status_only)
        .await;
    assert!(matches!(refused, Err(AppError::DisallowedFields(_))));

    let missing = fixture
        .projects
        .check_project_update(&author, taskboard_domain::ProjectId::new(), &status_and_title)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn project_image_follows_the_project_policy() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let project = fixture.project(&author, &executor).await;
    let image = |name: &str, bytes: Vec<u8>| UploadedFile {
        filename: name.to_owned(),
        bytes,
    };

    let refused = fixture
        .projects
        .set_project_image(&executor, project.id(), Some(image("plan.png", vec![7])))
        .await;
    match refused {
        Err(AppError::DisallowedFields(fields)) => assert_eq!(fields, vec!["image".to_owned()]),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(fixture.blobs.is_empty().await);

    let missing = fixture
        .projects
        .set_project_image(&author, project.id(), None)
        .await;
    assert!(matches!(missing, Err(AppError::MissingAttachment(_))));

    let absent = fixture.projects.download_project_image(project.id()).await;
    assert!(matches!(absent, Err(AppError::NotFound(_))));

    let first = fixture
        .projects
        .set_project_image(&author, project.id(), Some(image("plan.png", vec![1])))
        .await
        .unwrap_or_else(|error| panic!("image upload failed: {error}"));
    assert_eq!(first.version(), project.version() + 1);

    let replaced = fixture
        .projects
        .set_project_image(&author, project.id(), Some(image("site.png", vec![2, 3])))
        .await
        .unwrap_or_else(|error| panic!("image replacement failed: {error}"));
    assert_eq!(fixture.blobs.len().await, 1);
    assert_eq!(
        replaced.image().map(|image| image.filename.as_str()),
        Some("site.png")
    );

    let download = fixture
        .projects
        .download_project_image(project.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(download.bytes, vec![2, 3]);
    assert_eq!(download.image.filename, "site.png");

    let removal = fixture
        .projects
        .remove_project_image(&executor, project.id())
        .await;
    assert!(matches!(removal, Err(AppError::DisallowedFields(_))));

    let cleared = fixture
        .projects
        .remove_project_image(&author, project.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(cleared.image().is_none());
    assert!(fixture.blobs.is_empty().await);

    let unchanged = fixture
        .projects
        .remove_project_image(&author, project.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(unchanged.version(), cleared.version());
}

#[tokio::test]
async fn deleting_a_project_removes_its_image() {
    let fixture = Fixture::new();
    let author = fixture.user("anna", &["author"]).await;
    let executor = fixture.user("erik", &[]).await;
    let project = fixture.project(&author, &executor).await;

    fixture
        .projects
        .set_project_image(
            &author,
            project.id(),
            Some(UploadedFile {
                filename: "cover.jpg".to_owned(),
                bytes: vec![9, 9],
            }),
        )
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(fixture.blobs.len().await, 1);

    fixture
        .projects
        .delete_project(&author, project.id())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(fixture.blobs.is_empty().await);
}
