//! Configuration loading against the real process environment.
//!
//! This is the only test in this binary, so mutating the process
//! environment cannot race with other tests.

use std::fs;

use rest_api_template::config::ConfigService;

#[test]
fn test_env_file_fills_unset_variables_only() {
    let path = std::env::temp_dir().join(format!("rest-api-template-{}.env", std::process::id()));
    fs::write(&path, "DB_NAME=from_file\nDB_USER=file_user\nREDIS_DB=4\n").unwrap();
    std::env::set_var("DB_USER", "process_user");
    std::env::remove_var("DB_NAME");
    std::env::remove_var("REDIS_DB");
    std::env::remove_var("DB_PORT");

    let mut config = ConfigService::from_process_env().with_env_file(&path);
    config.load_config();

    assert_eq!(config.db_config().name, "from_file");
    assert_eq!(config.db_config().user, "process_user");
    assert_eq!(config.db_config().port, "3306");
    assert_eq!(config.redis_config().db, 4);

    let first = config.db_config().clone();
    config.load_config();
    assert_eq!(config.db_config(), &first);

    fs::remove_file(&path).unwrap_or_default();
}
