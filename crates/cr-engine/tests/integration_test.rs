use async_trait::async_trait;
use cr_config::Config;
use cr_core::{RatingCode, UnitId, Viewer, ViewerPermissions};
use cr_engine::{ImageDisplay, RatingEngine};
use cr_storage::{MemoryBackend, PageProp, RatingBackend, StorageError};

fn code(s: &str) -> RatingCode {
    RatingCode::new(s).unwrap()
}

fn viewer(allowed: &[&str]) -> Viewer {
    let mut perms = ViewerPermissions::new();
    for c in ["R15", "R18", "R18G"] {
        perms.set(code(c), allowed.contains(&c));
    }
    Viewer::registered(perms)
}

async fn sqlite_engine(dir: &tempfile::TempDir) -> RatingEngine<cr_storage::SqliteBackend> {
    let mut config = Config::default();
    config.storage.database_path = Some(dir.path().join("ratings.db"));
    RatingEngine::open(&config).await.unwrap()
}

#[tokio::test]
async fn test_page_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let engine = sqlite_engine(&dir).await;

    // the image page declares its own rating
    let image = UnitId(100);
    let mut image_page = engine.session(image);
    assert_eq!(image_page.directive("R-18").await.unwrap(), "R18");
    image_page.finish();

    // an article embeds the image and gates a section
    let mut article = engine.session(UnitId(1));
    article.push_str("<h2>Story</h2>");
    article.block_tag([("start", "R 15")]);
    article.push_str("<p>mild</p>");
    article.block_tag([("end", "R 15")]);
    article.embed(image, "<img src=\"scene.png\">").await.unwrap();
    article.push_str("<p>end</p>");
    let artifact = article.finish();
    assert!(artifact.rating.is_none());

    assert_eq!(
        engine.redact(&artifact.text, &viewer(&["R15", "R18"])),
        "<h2>Story</h2><p>mild</p><img src=\"scene.png\"><p>end</p>"
    );
    assert_eq!(
        engine.redact(&artifact.text, &viewer(&["R15"])),
        "<h2>Story</h2><p>mild</p><p>end</p>"
    );
    assert_eq!(
        engine.redact(&artifact.text, &viewer(&["R18"])),
        "<h2>Story</h2><img src=\"scene.png\"><p>end</p>"
    );
    assert_eq!(
        engine.redact(&artifact.text, &Viewer::anonymous()),
        "<h2>Story</h2><p>end</p>"
    );

    // the file page itself
    let gate = engine.gate();
    assert_eq!(
        gate.display_image(image, &viewer(&["R15"])).await.unwrap(),
        ImageDisplay::Placeholder(Config::default().media.warning_image)
    );
    assert_eq!(
        gate.display_image(image, &viewer(&["R18"])).await.unwrap(),
        ImageDisplay::Original
    );
}

#[tokio::test]
async fn test_rating_change_visible_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let engine = sqlite_engine(&dir).await;
    let unit = UnitId(7);

    engine.store().set_rating(unit, &code("R18")).await.unwrap();
    assert_eq!(engine.rating(unit).await.unwrap(), Some(code("R18")));

    let mut session = engine.session(unit);
    session.directive("r15").await.unwrap();
    assert_eq!(engine.rating(unit).await.unwrap(), Some(code("R15")));

    engine.store().clear_rating(unit).await.unwrap();
    assert_eq!(engine.rating(unit).await.unwrap(), None);
    assert!(engine.gate().is_allowed(unit, &Viewer::anonymous()).await.unwrap());
}

#[tokio::test]
async fn test_ineligible_matches_all_denied() {
    let engine = RatingEngine::new(&Config::default(), MemoryBackend::new()).unwrap();
    let emitter = engine.emitter();
    engine.store().set_rating(UnitId(9), &code("R18G")).await.unwrap();

    let inline = emitter.emit_inline_markers(UnitId(9)).await.unwrap();
    let doc = format!(
        "x{}a{}y{}z",
        emitter.emit_block_markers(Some("15"), None),
        emitter.emit_block_markers(None, Some("15")),
        inline.wrap("<img>")
    );

    let mut blocked = viewer(&["R15", "R18", "R18G"]);
    blocked.eligible = false;
    assert_eq!(engine.redact(&doc, &blocked), engine.redact(&doc, &viewer(&[])));
    assert_eq!(engine.redact(&doc, &blocked), "xyz");

    let once = engine.redact(&doc, &viewer(&["R15"]));
    assert_eq!(once, "xayz");
    assert_eq!(engine.redact(&once, &viewer(&["R15"])), once);
}

#[tokio::test]
async fn test_redaction_report() {
    let engine = RatingEngine::new(&Config::default(), MemoryBackend::new()).unwrap();
    let emitter = engine.emitter();
    let doc = format!(
        "{}gated{}{}",
        emitter.emit_block_markers(Some("R18"), None),
        emitter.emit_block_markers(None, Some("R18")),
        emitter.emit_block_markers(Some("R15"), None),
    );

    let (out, report) = engine.redact_with_report(&doc, &viewer(&[]));
    assert_eq!(out, "<rating-start-r15></rating-start-r15>");
    let r15 = report.iter().find(|i| i.code == "r15").unwrap();
    let r18 = report.iter().find(|i| i.code == "r18").unwrap();
    assert_eq!(r15.orphaned_markers, 1);
    assert_eq!(r18.removed_regions, 1);
}

struct Offline;

#[async_trait]
impl RatingBackend for Offline {
    async fn fetch(&self, _unit: UnitId) -> cr_storage::Result<Option<String>> {
        Err(StorageError::Unavailable(sqlx::Error::PoolTimedOut))
    }

    async fn upsert(&self, _unit: UnitId, _code: &RatingCode) -> cr_storage::Result<()> {
        Err(StorageError::Unavailable(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _unit: UnitId) -> cr_storage::Result<()> {
        Err(StorageError::Unavailable(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self) -> cr_storage::Result<Vec<PageProp>> {
        Err(StorageError::Unavailable(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_store_outage_degrades_by_default() {
    let engine = RatingEngine::new(&Config::default(), Offline).unwrap();

    assert_eq!(engine.rating(UnitId(1)).await.unwrap(), None);
    assert!(engine.gate().is_allowed(UnitId(1), &Viewer::anonymous()).await.unwrap());
    assert!(engine.emitter().emit_inline_markers(UnitId(1)).await.unwrap().is_empty());

    let mut session = engine.session(UnitId(1));
    assert_eq!(session.directive("R18").await.unwrap(), "R18");
}

#[tokio::test]
async fn test_store_outage_surfaces_when_strict() {
    let mut config = Config::default();
    config.storage.strict_errors = true;
    let engine = RatingEngine::new(&config, Offline).unwrap();

    let err = engine.rating(UnitId(1)).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(engine.gate().is_allowed(UnitId(1), &Viewer::anonymous()).await.is_err());
    assert!(engine.session(UnitId(1)).directive("R18").await.is_err());
}
