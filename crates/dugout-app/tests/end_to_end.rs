// Config file + fixture directory through to rendered command output.

use dugout_app::cli::{execute, Command};
use dugout_app::config::{load_config_from, Config};
use dugout_app::export::OutputFormat;
use dugout_app::loader::{load_snapshot, source_from_config};
use dugout_core::dataset::LeagueSnapshot;
use std::fs;
use std::path::PathBuf;

async fn setup(name: &str) -> (Config, LeagueSnapshot) {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("config")).unwrap();
    let toml = format!(
        r#"
[data]
source = {source:?}
glossary = "glossary.json"

[leaderboard]
page_size = 3

[[franchises]]
label = "CLE"
eras = [
    {{ abbreviation = "TEX", first_season = 2, last_season = 5 }},
    {{ abbreviation = "CLE", first_season = 6 }},
]
"#,
        source = fixtures.display().to_string()
    );
    fs::write(tmp.join("config/dugout.toml"), toml).unwrap();

    let config = load_config_from(&tmp).unwrap();
    let source = source_from_config(&config);
    let snapshot = load_snapshot(source.as_ref(), &config.data).await.unwrap();
    (config, snapshot)
}

fn leaders(stat: &str, pitching: bool, franchise: Option<&str>, format: OutputFormat) -> Command {
    Command::Leaders {
        stat: stat.to_string(),
        pitching,
        franchise: franchise.map(String::from),
        reverse: false,
        top: None,
        format,
    }
}

#[tokio::test]
async fn franchise_leaders_follow_lineage() {
    let (config, snapshot) = setup("dugout_e2e_franchise").await;
    let out = execute(&leaders("HR", false, Some("CLE"), OutputFormat::Csv), &config, &snapshot).unwrap();
    assert!(out.contains("S3,1,2,Bo Bell,S3,TEX,7"));
    assert!(out.contains("S7,1,3,Cy Cole,S7,CLE,9"));
    assert!(!out.contains("NYM"));
}

#[tokio::test]
async fn text_leaders_use_configured_page_size() {
    let (config, snapshot) = setup("dugout_e2e_text").await;
    let out = execute(&leaders("SV", true, None, OutputFormat::Text), &config, &snapshot).unwrap();
    assert!(out.starts_with("SV Leaderboards"));
    // Single Season: 2, 1, 1 fits in three rows with no overflow.
    assert!(!out.contains("tied with"));
    assert!(out.contains("Gus Gray"));
}

#[tokio::test]
async fn unknown_stat_is_an_error_for_the_cli() {
    let (config, snapshot) = setup("dugout_e2e_unknown").await;
    let err = execute(&leaders("RBI", true, None, OutputFormat::Text), &config, &snapshot).unwrap_err();
    assert!(err.to_string().contains("not a pitching leaderboard stat"));
}

#[tokio::test]
async fn player_page_resolves_former_names() {
    let (config, snapshot) = setup("dugout_e2e_player").await;
    let command = Command::Player {
        name: "Bobby Bell".to_string(),
        pitching: false,
    };
    let out = execute(&command, &config, &snapshot).unwrap();
    assert!(out.starts_with("Bo Bell (#2)"));
    assert!(out.contains("Formerly: Bobby Bell"));
    assert!(out.contains("Career"));
    assert!(out.contains(".300"));
}

#[tokio::test]
async fn stat_list_includes_glossary_text() {
    let (config, snapshot) = setup("dugout_e2e_stats").await;
    let out = execute(&Command::Stats { pitching: true }, &config, &snapshot).unwrap();
    assert!(out.contains("Runs allowed per six innings."));
    assert!(out.lines().any(|l| l.starts_with("SV") && l.contains("counting")));
    assert!(out.lines().any(|l| l.starts_with("ERA") && l.contains("low")));
}
