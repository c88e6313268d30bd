use axes::{
    Access, AccessQuery, NewAccessAttempt, NewAccessLog, NewAccessRecord, SqliteConfig,
    labels::{Locale, Model, extended_names, model_labels},
    ordering::sort_newest_first,
};
use chrono::{Duration, SecondsFormat, Utc};

fn setup() {
    let _ = tracing_subscriber::fmt().try_init();
}

fn access(username: &str, ip: &str) -> NewAccessRecord {
    NewAccessRecord::builder()
        .user_agent("Mozilla/5.0 (X11; Linux x86_64)")
        .ip_address(ip.parse().unwrap())
        .username(username)
        .http_accept("text/html,application/xhtml+xml")
        .path_info("/admin/login/")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_sqlite_login_and_logout_history() {
    setup();
    let axes = axes::sqlite("sqlite::memory:").await.unwrap();

    // Two failed tries, then a successful login
    for failures in 1..=2 {
        axes.record_attempt(
            NewAccessAttempt::new(access("alice", "192.168.1.10"))
                .with_post_data("username=alice")
                .with_failures(failures),
        )
        .await
        .unwrap();
    }
    let log = axes
        .record_access(NewAccessLog::new(access("alice", "192.168.1.10")))
        .await
        .unwrap();
    assert!(!log.is_logged_out());

    let attempts = axes
        .recent_attempts(&AccessQuery::new().username("alice"))
        .await
        .unwrap();
    assert_eq!(attempts.len(), 2);
    for attempt in &attempts {
        assert_eq!(attempt.failures(), attempt.failures_since_start);
        assert!(attempt.to_string().starts_with("Attempted Access: "));
    }
    assert_eq!(
        axes.failures_for(&AccessQuery::new().username("alice"))
            .await
            .unwrap(),
        3
    );

    let logged_out = axes.record_logout(log.id).await.unwrap();
    assert!(logged_out.is_logged_out());
    assert_eq!(logged_out.attempt_time(), log.attempt_time());
    assert!(axes.record_logout(log.id).await.unwrap_err().is_conflict());

    let logs = axes.recent_logs(&AccessQuery::new()).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(
        logs[0].to_string(),
        format!(
            "Access Log for alice @ {}",
            logs[0]
                .attempt_time()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )
    );
}

#[tokio::test]
async fn test_sqlite_results_are_newest_first() {
    setup();
    let axes = axes::sqlite("sqlite::memory:").await.unwrap();

    for _ in 0..3 {
        axes.record_attempt(NewAccessAttempt::new(access("bob", "10.0.0.5")))
            .await
            .unwrap();
    }

    let listed = axes.recent_attempts(&AccessQuery::new()).await.unwrap();
    assert!(
        listed
            .windows(2)
            .all(|w| w[0].attempt_time() >= w[1].attempt_time())
    );

    let mut resorted = listed.clone();
    sort_newest_first(&mut resorted);
    assert_eq!(
        resorted.iter().map(|a| a.attempt_time()).collect::<Vec<_>>(),
        listed.iter().map(|a| a.attempt_time()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_sqlite_reset_and_purge() {
    setup();
    let axes = axes::sqlite_with(&SqliteConfig {
        max_connections: 1,
        ..Default::default()
    })
    .await
    .unwrap();

    axes.record_attempt(NewAccessAttempt::new(access("alice", "10.0.0.1")))
        .await
        .unwrap();
    axes.record_attempt(NewAccessAttempt::new(access("bob", "10.0.0.2")))
        .await
        .unwrap();
    axes.record_access(NewAccessLog::new(access("bob", "10.0.0.2")))
        .await
        .unwrap();

    let reset = axes
        .reset_attempts(&AccessQuery::new().ip_address("10.0.0.1".parse().unwrap()))
        .await
        .unwrap();
    assert_eq!(reset, 1);

    let kept = axes
        .purge_before(Utc::now() - Duration::days(30))
        .await
        .unwrap();
    assert_eq!((kept.attempts, kept.logs), (0, 0));

    let purged = axes
        .purge_before(Utc::now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!((purged.attempts, purged.logs), (1, 1));
}

#[test]
fn test_labels_are_reexported() {
    assert_eq!(model_labels(Model::AccessLog).verbose_name_plural, "access logs");
    assert_eq!(
        extended_names(Model::AccessAttempt, Locale::Ru).map(|n| n.add),
        Some("попытку войти")
    );
}
