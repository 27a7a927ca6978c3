use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::domain::issue::MIGRATED_LABEL;
use crate::domain::EntityKind;
use crate::error::Side;
use crate::model::request::{IssueCommentRequest, ProjectCardRequest};
use crate::model::{Issue, Label, Milestone, Project, ProjectCard, ProjectColumn, User};
use crate::providers::tests::{MockRepo, RepoState};

fn source_repo() -> Repository {
    Repository::new("aereal", "old-repo")
}

fn target_repo() -> Repository {
    Repository::new("aereal", "new-repo")
}

fn milestone(title: &str, description: &str) -> Milestone {
    Milestone {
        number: 1,
        description: Some(description.to_string()),
        ..Milestone::new(title)
    }
}

fn issue(number: u64, title: &str) -> Issue {
    Issue {
        id: 500 + number,
        html_url: format!("https://ghe.example.com/aereal/old-repo/issues/{number}"),
        ..Issue::new(number, title)
    }
}

fn project(id: u64, name: &str) -> Project {
    Project {
        id,
        name: name.to_string(),
        body: None,
    }
}

fn column(id: u64, name: &str) -> ProjectColumn {
    ProjectColumn {
        id,
        name: name.to_string(),
    }
}

fn issue_card(id: u64, content_url: &str) -> ProjectCard {
    ProjectCard {
        id,
        note: None,
        archived: false,
        content_url: Some(content_url.to_string()),
    }
}

/// Source and target each with one "Roadmap" project holding a "To Do" column.
fn board(source_cards: Vec<ProjectCard>, target_issues: Vec<Issue>) -> (MockRepo, MockRepo) {
    let source = RepoState {
        projects: vec![project(1, "Roadmap")],
        columns: HashMap::from([(1, vec![column(11, "To Do")])]),
        cards: HashMap::from([(11, source_cards)]),
        ..Default::default()
    };
    let target = RepoState {
        issues: target_issues,
        projects: vec![project(2, "Roadmap")],
        columns: HashMap::from([(2, vec![column(22, "To Do")])]),
        ..Default::default()
    };
    (MockRepo::new(source), MockRepo::new(target))
}

async fn build_plan(source: &MockRepo, target: &MockRepo) -> Result<MigrationPlan, MigrationError> {
    build_plan_with(source, target, &UserAliasResolver::default()).await
}

async fn build_plan_with(
    source: &MockRepo,
    target: &MockRepo,
    resolver: &UserAliasResolver,
) -> Result<MigrationPlan, MigrationError> {
    let (source_repo, target_repo) = (source_repo(), target_repo());
    PlanBuilder::new(source, target, resolver, &source_repo, &target_repo)
        .build()
        .await
}

/// Formatted log output collected by a thread-local subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn instant_executor() -> Executor {
    Executor::new(10, Duration::ZERO)
}

#[tokio::test]
async fn empty_repositories_produce_empty_plan() {
    let plan = build_plan(&MockRepo::default(), &MockRepo::default()).await.unwrap();
    assert!(plan.is_empty());
    assert!(plan.skipped_cards.is_empty());
}

#[tokio::test]
async fn new_milestone_is_created_verbatim() {
    let source = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "first")],
        ..Default::default()
    });
    let plan = build_plan(&source, &MockRepo::default()).await.unwrap();

    assert_eq!(plan.actions.len(), 1);
    match &plan.actions[0] {
        Action::CreateMilestone { repo, milestone } => {
            assert_eq!(repo, &target_repo());
            assert_eq!(milestone.title, "v1");
            assert_eq!(milestone.description.as_deref(), Some("first"));
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn changed_milestone_is_updated_with_source_description() {
    let source = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "new")],
        ..Default::default()
    });
    let target = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "old")],
        ..Default::default()
    });
    let plan = build_plan(&source, &target).await.unwrap();

    assert_eq!(plan.actions.len(), 1);
    match &plan.actions[0] {
        Action::UpdateMilestone { number, milestone, .. } => {
            assert_eq!(*number, 1);
            assert_eq!(milestone.description.as_deref(), Some("new"));
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn milestone_update_addresses_target_number() {
    let mut renumbered = milestone("v1", "new");
    renumbered.number = 3;
    let source = MockRepo::new(RepoState {
        milestones: vec![renumbered],
        ..Default::default()
    });
    let target = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "old")],
        ..Default::default()
    });
    let migrator = Migrator::new(
        &source,
        &target,
        &target,
        UserAliasResolver::default(),
        instant_executor(),
    );

    let plan = migrator.plan(&source_repo(), &target_repo()).await.unwrap();
    match plan.actions.as_slice() {
        [Action::UpdateMilestone { number, .. }] => assert_eq!(*number, 1),
        other => panic!("unexpected actions {other:?}"),
    }

    migrator.migrate(&source_repo(), &target_repo()).await.unwrap();
    let state = target.snapshot();
    assert_eq!(state.milestones[0].number, 1);
    assert_eq!(state.milestones[0].description.as_deref(), Some("new"));
    assert!(migrator.plan(&source_repo(), &target_repo()).await.unwrap().is_empty());
}

#[tokio::test]
async fn stages_run_in_dependency_order() {
    let source = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "first")],
        labels: vec![Label::new("bug")],
        issues: vec![issue(1, "first issue")],
        projects: vec![project(1, "Roadmap")],
        ..Default::default()
    });
    let plan = build_plan(&source, &MockRepo::default()).await.unwrap();
    let kinds: Vec<_> = plan.actions.iter().map(Action::as_str).collect();
    assert_eq!(
        kinds,
        vec!["create_milestone", "create_label", "create_issue", "create_project"]
    );
}

#[tokio::test]
async fn closed_issue_is_created_then_closed() {
    let mut closed = issue(4, "done already");
    closed.state = "closed".into();
    let source = MockRepo::new(RepoState {
        issues: vec![closed],
        ..Default::default()
    });
    let plan = build_plan(&source, &MockRepo::default()).await.unwrap();

    assert_eq!(plan.actions.len(), 2);
    assert_eq!(plan.actions[0].as_str(), "create_issue");
    match &plan.actions[1] {
        Action::UpdateIssue { number, issue, .. } => {
            assert_eq!(*number, 4);
            assert_eq!(issue.state.as_deref(), Some("closed"));
            assert!(issue.labels.is_none());
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn differing_issue_gets_comment_and_migrated_label() {
    let mut source_issue = issue(1, "title");
    source_issue.labels = vec![Label::new("bug")];
    source_issue.assignees = vec![User { login: "alice".into() }, User { login: "bob".into() }];
    let source = MockRepo::new(RepoState {
        issues: vec![source_issue],
        ..Default::default()
    });
    let target = MockRepo::new(RepoState {
        issues: vec![issue(1, "title")],
        ..Default::default()
    });
    let resolver = UserAliasResolver::new(
        HashMap::from([("alice".to_string(), "alice-dotcom".to_string())]),
        vec!["bob".to_string()],
    );
    let plan = build_plan_with(&source, &target, &resolver).await.unwrap();

    assert_eq!(plan.actions.len(), 2);
    match &plan.actions[0] {
        Action::CreateIssueComment { number, comment, .. } => {
            assert_eq!(*number, 1);
            assert_eq!(
                comment,
                &IssueCommentRequest {
                    body: "This issue or P-R referenced as https://ghe.example.com/aereal/old-repo/issues/1 in previous repository (aereal/old-repo)".into()
                }
            );
        }
        other => panic!("unexpected action {other:?}"),
    }
    match &plan.actions[1] {
        Action::UpdateIssue { issue, .. } => {
            assert_eq!(issue.labels, Some(vec![MIGRATED_LABEL.to_string(), "bug".to_string()]));
            assert_eq!(issue.assignees, Some(vec!["alice-dotcom".to_string()]));
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn migrated_issue_is_left_alone() {
    let source = MockRepo::new(RepoState {
        issues: vec![issue(1, "renamed upstream")],
        ..Default::default()
    });
    let mut migrated = issue(1, "original");
    migrated.labels = vec![Label::new(MIGRATED_LABEL)];
    let target = MockRepo::new(RepoState {
        issues: vec![migrated],
        ..Default::default()
    });
    assert!(build_plan(&source, &target).await.unwrap().is_empty());
}

#[tokio::test]
async fn issue_card_references_target_issue_id() {
    let mut target_issue = issue(42, "answer");
    target_issue.id = 9001;
    let (source, target) = board(
        vec![issue_card(100, "https://ghe.example.com/api/v3/repos/aereal/old-repo/issues/42")],
        vec![target_issue],
    );
    let plan = build_plan(&source, &target).await.unwrap();

    assert_eq!(
        plan.actions,
        vec![Action::CreateProjectCard {
            column_id: 22,
            card: ProjectCardRequest::issue(9001),
        }]
    );
}

#[tokio::test]
async fn card_without_issue_path_is_skipped() {
    let (source, target) = board(
        vec![issue_card(100, "https://ghe.example.com/api/v3/repos/aereal/old-repo/pulls/42")],
        vec![],
    );
    let logs = CapturedLogs::default();
    let plan = {
        let _guard = logs.install();
        build_plan(&source, &target).await.unwrap()
    };

    assert!(plan.actions.is_empty());
    let output = logs.contents();
    assert_eq!(output.matches("WARN").count(), 1);
    assert!(output.contains("card has invalid content URL, skipping"));
    assert!(output.contains("card_id=100"));
    assert_eq!(
        plan.skipped_cards,
        vec![SkippedCard {
            card_id: 100,
            content_url: Some("https://ghe.example.com/api/v3/repos/aereal/old-repo/pulls/42".into()),
        }]
    );
}

#[tokio::test]
async fn card_for_unknown_issue_aborts_plan() {
    let (source, target) = board(
        vec![issue_card(100, "https://ghe.example.com/api/v3/repos/aereal/old-repo/issues/7")],
        vec![],
    );
    let err = build_plan(&source, &target).await.unwrap_err();
    assert!(matches!(err, MigrationError::MissingIssueMapping { number: 7 }));
}

#[tokio::test]
async fn missing_column_is_created_on_target_project() {
    let (source, target) = board(vec![], vec![]);
    source
        .state
        .lock()
        .unwrap()
        .columns
        .get_mut(&1)
        .unwrap()
        .push(column(12, "Done"));
    let plan = build_plan(&source, &target).await.unwrap();

    assert_eq!(plan.actions.len(), 1);
    match &plan.actions[0] {
        Action::CreateProjectColumn { project_id, column } => {
            assert_eq!(*project_id, 2);
            assert_eq!(column.name, "Done");
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn nested_stages_log_their_action_counts() {
    let (source, target) = board(
        vec![issue_card(100, "https://ghe.example.com/api/v3/repos/aereal/old-repo/issues/42")],
        vec![{
            let mut target_issue = issue(42, "answer");
            target_issue.id = 9001;
            target_issue
        }],
    );
    source
        .state
        .lock()
        .unwrap()
        .columns
        .get_mut(&1)
        .unwrap()
        .push(column(12, "Done"));

    let logs = CapturedLogs::default();
    let plan = {
        let _guard = logs.install();
        build_plan(&source, &target).await.unwrap()
    };

    assert_eq!(plan.actions.len(), 2);
    let output = logs.contents();
    let stage_line = |kind: &str| {
        output
            .lines()
            .find(|line| line.contains("stage planned") && line.contains(&format!("kind=\"{kind}\"")))
            .map(str::to_string)
    };
    let columns = stage_line("project_column").unwrap();
    assert!(columns.contains("actions=1"), "{columns}");
    let cards = stage_line("project_card").unwrap();
    assert!(cards.contains("actions=1"), "{cards}");
    let projects = stage_line("project").unwrap();
    assert!(projects.contains("actions=0"), "{projects}");
}

#[tokio::test]
async fn fetch_failure_names_kind_and_side() {
    let source = MockRepo::default();
    let target = MockRepo::default().failing_listing(EntityKind::Label);
    let err = build_plan(&source, &target).await.unwrap_err();

    match &err {
        MigrationError::Fetch { kind, side, .. } => {
            assert_eq!(*kind, EntityKind::Label);
            assert_eq!(*side, Side::Target);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.to_string(), "failed to fetch labels from target repository aereal/new-repo");
}

#[tokio::test]
async fn executor_pauses_after_each_full_batch() {
    let actions: Vec<Action> = (0..25)
        .map(|n| Action::CreateIssueComment {
            repo: target_repo(),
            number: n,
            comment: IssueCommentRequest { body: "hi".into() },
        })
        .collect();
    let writer = MockRepo::default();
    let report = instant_executor().execute(&writer, &actions).await.unwrap();

    assert_eq!(report, ExecutionReport { executed: 25, pauses: 2 });
    assert_eq!(writer.call_log().len(), 25);
}

#[tokio::test]
async fn executor_stops_at_first_failure() {
    let actions: Vec<Action> = (1..=4)
        .map(|n| Action::CreateIssueComment {
            repo: target_repo(),
            number: n,
            comment: IssueCommentRequest { body: "hi".into() },
        })
        .collect();
    let writer = MockRepo::default().failing_call(2);
    let err = instant_executor().execute(&writer, &actions).await.unwrap_err();

    assert_eq!(err.to_string(), "failed to create issue comment on aereal/new-repo#3");
    // Earlier actions stay applied.
    assert_eq!(writer.snapshot().comments.len(), 2);
}

#[tokio::test]
async fn failed_plan_executes_nothing() {
    let source = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "first")],
        ..Default::default()
    });
    let target = MockRepo::default().failing_listing(EntityKind::Project);
    let migrator = Migrator::new(
        &source,
        &target,
        &target,
        UserAliasResolver::default(),
        instant_executor(),
    );
    assert!(migrator.migrate(&source_repo(), &target_repo()).await.is_err());
    assert!(target.call_log().is_empty());
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let mut closed = issue(2, "closed one");
    closed.state = "closed".into();
    closed.labels = vec![Label::new("bug")];
    let source = MockRepo::new(RepoState {
        milestones: vec![milestone("v1", "first")],
        labels: vec![Label::new("bug"), Label::new("wontfix")],
        issues: vec![issue(1, "open one"), closed],
        projects: vec![project(1, "Roadmap")],
        columns: HashMap::from([(1, vec![column(11, "To Do")])]),
        ..Default::default()
    });
    let target = MockRepo::default();
    let migrator = Migrator::new(
        &source,
        &target,
        &target,
        UserAliasResolver::default(),
        instant_executor(),
    );

    // The project is created first, its columns on the following run.
    let first = migrator.migrate(&source_repo(), &target_repo()).await.unwrap();
    assert_eq!(first.executed, 7);
    let second = migrator.migrate(&source_repo(), &target_repo()).await.unwrap();
    assert_eq!(second.executed, 1);

    let state = target.snapshot();
    assert_eq!(state.issues[1].state, "closed");
    assert!(migrator.plan(&source_repo(), &target_repo()).await.unwrap().is_empty());
}

#[tokio::test]
async fn updated_issue_is_matched_by_marker_afterwards() {
    let source = MockRepo::new(RepoState {
        issues: vec![issue(1, "new title")],
        ..Default::default()
    });
    let target = MockRepo::new(RepoState {
        issues: vec![issue(1, "old title")],
        ..Default::default()
    });
    let migrator = Migrator::new(
        &source,
        &target,
        &target,
        UserAliasResolver::default(),
        instant_executor(),
    );

    migrator.migrate(&source_repo(), &target_repo()).await.unwrap();
    let state = target.snapshot();
    assert_eq!(state.comments.len(), 1);
    // Title still differs; only the marker keeps the issue from being updated again.
    assert_eq!(state.issues[0].title, "old title");
    assert!(migrator.plan(&source_repo(), &target_repo()).await.unwrap().is_empty());
}
