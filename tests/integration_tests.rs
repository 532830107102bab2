//! Integration tests for hepref
//!
//! These tests run the whole pipeline against a local mock of INSPIRE-HEP and
//! NASA ADS: read the .aux and .bib files, fetch what is missing, append it.

use hepref::config::ProvidersConfig;
use hepref::keys::parse_bib;
use hepref::models::FailureKind;
use hepref::utils::HttpClient;
use hepref::{aux_path_for, ReconcileError, Reconciler, SourceRegistry};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const EXISTING_BIB: &str = r#"@article{Einstein:1916vd,
    author = "Einstein, Albert",
    title = "{Die Grundlage der allgemeinen Relativit\"atstheorie}",
    journal = "Annalen Phys.",
    year = "1916"
}
"#;

const WEINBERG_BIBTEX: &str = r#"@article{Weinberg:1967tq,
    author = "Weinberg, Steven",
    title = "{A Model of Leptons}",
    journal = "Phys. Rev. Lett.",
    volume = "19",
    year = "1967"
}
"#;

const ADS_BIBTEX: &str = r#"@ARTICLE{2016PhRvL.116f1102A,
       author = {{Abbott}, B.~P. and others},
        title = "{Observation of Gravitational Waves from a Binary Black Hole Merger}",
      journal = {\prl},
         year = 2016,
}"#;

fn export_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><div class="modal">
<textarea class="export-textarea form-control" rows="20" readonly>{}</textarea>
</div></body></html>"#,
        content
    )
}

struct Workspace {
    _dir: tempfile::TempDir,
    tex: PathBuf,
    bib: PathBuf,
}

impl Workspace {
    fn new(aux: Option<&str>, bib: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("paper.tex");
        let bib_path = dir.path().join("refs.bib");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();
        if let Some(aux) = aux {
            std::fs::write(aux_path_for(&tex), aux).unwrap();
        }
        std::fs::write(&bib_path, bib).unwrap();
        Self {
            _dir: dir,
            tex,
            bib: bib_path,
        }
    }

    fn aux(&self) -> PathBuf {
        aux_path_for(&self.tex)
    }

    fn bib_content(&self) -> String {
        std::fs::read_to_string(&self.bib).unwrap()
    }
}

fn reconciler_for(server: &ServerGuard) -> Reconciler {
    let providers = ProvidersConfig {
        inspire_url: server.url(),
        ads_url: server.url(),
    };
    let client = Arc::new(HttpClient::new().unwrap());
    Reconciler::new(SourceRegistry::new(client, &providers))
}

async fn mock_inspire_hit(server: &mut ServerGuard, key: &str, record_id: u32, bibtex: &str) {
    let export_path = format!("/api/literature/{}", record_id);
    server
        .mock("GET", "/api/literature")
        .match_query(Matcher::UrlEncoded("q".into(), key.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "hits": {
                    "total": 1,
                    "hits": [{
                        "links": {
                            "bibtex": format!("{}{}?format=bibtex", server.url(), export_path)
                        }
                    }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", export_path.as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(bibtex)
        .create_async()
        .await;
}

fn keys_in(path: &Path) -> Vec<String> {
    parse_bib(&std::fs::read_to_string(path).unwrap())
        .into_iter()
        .map(|k| k.into_inner())
        .collect()
}

#[tokio::test]
async fn test_fetches_from_both_providers() {
    let mut server = Server::new_async().await;
    mock_inspire_hit(&mut server, "Weinberg:1967tq", 51188, WEINBERG_BIBTEX).await;
    let ads_mock = server
        .mock("GET", "/abs/2016PhRvL.116f1102A/exportcitation")
        .with_status(200)
        .with_body(export_page(ADS_BIBTEX))
        .expect(1)
        .create_async()
        .await;

    let workspace = Workspace::new(
        Some("\\relax\n\\citation{Einstein:1916vd}\n\\citation{Weinberg:1967tq,2016PhRvL.116f1102A}\n\\bibdata{refs}"),
        EXISTING_BIB,
    );

    let report = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap();

    ads_mock.assert_async().await;
    assert_eq!(report.appended(), 2);
    assert_eq!(report.failed(), 0);

    let content = workspace.bib_content();
    assert!(content.starts_with(EXISTING_BIB));
    assert!(content[EXISTING_BIB.len()..].starts_with("\n@"));
    assert!(content.contains(WEINBERG_BIBTEX));
    assert!(content.contains(ADS_BIBTEX));

    let mut keys = keys_in(&workspace.bib);
    keys.sort();
    assert_eq!(
        keys,
        vec!["2016PhRvL.116f1102A", "Einstein:1916vd", "Weinberg:1967tq"]
    );
}

#[tokio::test]
async fn test_ambiguous_search_is_reported_and_skipped() {
    let mut server = Server::new_async().await;
    let _ambiguous = server
        .mock("GET", "/api/literature")
        .match_query(Matcher::UrlEncoded("q".into(), "X:2021abc".into()))
        .with_status(200)
        .with_body(json!({"hits": {"total": 2, "hits": [{}, {}]}}).to_string())
        .create_async()
        .await;
    mock_inspire_hit(&mut server, "Weinberg:1967tq", 51188, WEINBERG_BIBTEX).await;

    let workspace = Workspace::new(
        Some("\\citation{X:2021abc}\n\\citation{Weinberg:1967tq}\n"),
        EXISTING_BIB,
    );

    let report = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap();

    let ambiguous = report
        .outcomes
        .iter()
        .find(|o| o.key.as_str() == "X:2021abc")
        .unwrap();
    assert_eq!(ambiguous.failure(), Some(FailureKind::Ambiguous));
    assert_eq!(report.appended(), 1);
    assert_eq!(
        workspace.bib_content(),
        format!("{}\n{}", EXISTING_BIB, WEINBERG_BIBTEX)
    );
}

#[tokio::test]
async fn test_empty_ads_export_is_not_found() {
    let mut server = Server::new_async().await;
    let _ads_mock = server
        .mock("GET", "/abs/2016PhRvL.116f1102A/exportcitation")
        .with_status(200)
        .with_body(export_page(""))
        .create_async()
        .await;

    let workspace = Workspace::new(Some("\\citation{2016PhRvL.116f1102A}\n"), EXISTING_BIB);

    let report = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].failure(), Some(FailureKind::NotFound));
    assert_eq!(workspace.bib_content(), EXISTING_BIB);
}

#[tokio::test]
async fn test_nothing_missing_makes_no_requests() {
    let mut server = Server::new_async().await;
    let any_request = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let workspace = Workspace::new(Some("\\citation{Einstein:1916vd}\n"), EXISTING_BIB);

    let report = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap();

    any_request.assert_async().await;
    assert!(report.is_complete());
    assert_eq!(workspace.bib_content(), EXISTING_BIB);
}

#[tokio::test]
async fn test_second_run_finds_nothing_missing() {
    let mut server = Server::new_async().await;
    mock_inspire_hit(&mut server, "Weinberg:1967tq", 51188, WEINBERG_BIBTEX).await;

    let workspace = Workspace::new(
        Some("\\citation{Einstein:1916vd,Weinberg:1967tq}\n"),
        EXISTING_BIB,
    );
    let reconciler = reconciler_for(&server);

    let first = reconciler.run(&workspace.aux(), &workspace.bib).await.unwrap();
    assert_eq!(first.appended(), 1);
    let after_first = workspace.bib_content();

    let second = reconciler.run(&workspace.aux(), &workspace.bib).await.unwrap();
    assert!(second.is_complete());
    assert!(second.outcomes.is_empty());
    assert_eq!(workspace.bib_content(), after_first);
}

#[tokio::test]
async fn test_provider_outage_does_not_abort_run() {
    let mut server = Server::new_async().await;
    let _outage = server
        .mock("GET", "/abs/2016PhRvL.116f1102A/exportcitation")
        .with_status(503)
        .create_async()
        .await;
    mock_inspire_hit(&mut server, "Weinberg:1967tq", 51188, WEINBERG_BIBTEX).await;

    let workspace = Workspace::new(
        Some("\\citation{2016PhRvL.116f1102A,Weinberg:1967tq}\n"),
        "",
    );

    let report = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap();

    assert_eq!(report.appended(), 1);
    let failed = report.outcomes.iter().find(|o| !o.is_appended()).unwrap();
    assert_eq!(failed.key.as_str(), "2016PhRvL.116f1102A");
    assert_eq!(failed.failure(), Some(FailureKind::Transport));
    assert_eq!(workspace.bib_content(), format!("\n{}", WEINBERG_BIBTEX));
}

#[tokio::test]
async fn test_uncompiled_document_is_fatal() {
    let server = Server::new_async().await;
    let workspace = Workspace::new(None, EXISTING_BIB);

    let err = reconciler_for(&server)
        .run(&workspace.aux(), &workspace.bib)
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcileError::AuxNotFound { .. }));
    assert!(err.to_string().contains("paper.aux"));
}

#[test]
fn test_aux_path_derivation() {
    assert_eq!(
        aux_path_for(Path::new("/tmp/thesis/main.tex")),
        PathBuf::from("/tmp/thesis/main.aux")
    );
}

#[test]
fn test_source_files_avoid_windows_device_names() {
    const RESERVED: &[&str] = &[
        "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
        "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
    ];

    fn visit(dir: &Path, offenders: &mut Vec<PathBuf>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(&path, offenders);
            }
            let stem = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.split('.').next())
                .unwrap_or_default()
                .to_ascii_lowercase();
            if RESERVED.contains(&stem.as_str()) {
                offenders.push(path);
            }
        }
    }

    let mut offenders = Vec::new();
    visit(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut offenders);
    assert!(offenders.is_empty(), "reserved file names: {:?}", offenders);
}
