mod catalog_stub;

use std::fs;
use std::path::Path;

use predicates::prelude::*;

use catalog_stub::{CatalogStub, CatalogStubConfig};

fn booknook(data_dir: &Path, stub: &CatalogStub) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("booknook");
    cmd.env_remove("BOOKNOOK_COVERS_URL")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--catalog-url", stub.base_url.as_str()]);
    cmd
}

fn dune_stub() -> CatalogStub {
    CatalogStub::spawn(CatalogStubConfig::default().with_work(
        "/works/OL893415W",
        serde_json::json!({
            "key": "/works/OL893415W",
            "title": "Dune",
            "description": { "type": "/type/text", "value": "Spice and sand." },
            "covers": [11481354],
            "subjects": ["Science fiction", "Deserts"],
            "first_publish_date": "1965"
        }),
    ))
}

fn saved_keys(data_dir: &Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read_to_string(data_dir.join("bookNookFavorites.json"))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("key").and_then(|k| k.as_str()).map(str::to_owned))
        .collect())
}

#[test]
fn saved_book_survives_restart() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["show", "OL893415W", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Spice and sand."))
        .stdout(predicate::str::contains("Publication date: 1965"))
        .stdout(predicate::str::contains("[saved] Remove from favorites"));

    booknook(temp.path(), &stub)
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My Saved Books (1)"))
        .stdout(predicate::str::contains("  1. Dune"));

    assert_eq!(saved_keys(temp.path())?, vec!["/works/OL893415W"]);
    Ok(())
}

#[test]
fn saving_twice_keeps_one_record() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["favorites", "add", "OL893415W"])
        .assert()
        .success()
        .stdout("Saved \"Dune\" (/works/OL893415W).\n");
    booknook(temp.path(), &stub)
        .args(["favorites", "add", "/works/OL893415W"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is already saved"));

    assert_eq!(saved_keys(temp.path())?.len(), 1);
    assert_eq!(stub.detail_requests(), 1);
    Ok(())
}

#[test]
fn saved_book_is_shown_without_a_detail_request() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["favorites", "add", "OL893415W"])
        .assert()
        .success();
    booknook(temp.path(), &stub)
        .args(["show", "OL893415W"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"));
    assert_eq!(stub.detail_requests(), 1);

    booknook(temp.path(), &stub)
        .args(["show", "OL893415W", "--refresh"])
        .assert()
        .success();
    assert_eq!(stub.detail_requests(), 2);
    Ok(())
}

#[test]
fn remove_drops_the_record() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["favorites", "add", "OL893415W"])
        .assert()
        .success();
    booknook(temp.path(), &stub)
        .args(["favorites", "remove", "OL893415W"])
        .assert()
        .success()
        .stdout("Removed /works/OL893415W from favorites.\n");
    booknook(temp.path(), &stub)
        .args(["favorites", "remove", "OL893415W"])
        .assert()
        .success()
        .stdout("/works/OL893415W is not in favorites.\n");

    assert!(saved_keys(temp.path())?.is_empty());
    Ok(())
}

#[test]
fn malformed_record_lists_as_empty() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();
    fs::write(temp.path().join("bookNookFavorites.json"), "{not json")?;

    booknook(temp.path(), &stub)
        .args(["favorites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You haven't saved any books yet."));
    Ok(())
}

#[test]
fn unknown_book_fails_and_cannot_be_saved() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["show", "OL1W", "--save"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Could not load book /works/OL1W"));

    assert!(!temp.path().join("bookNookFavorites.json").exists());
    Ok(())
}

#[test]
fn cover_prints_large_url_for_fetched_work() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = dune_stub();

    booknook(temp.path(), &stub)
        .args(["cover", "OL893415W", "--size", "L"])
        .assert()
        .success()
        .stdout("https://covers.openlibrary.org/b/id/11481354-L.jpg\n");
    Ok(())
}

#[test]
fn shell_browses_and_saves() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let stub = CatalogStub::spawn(CatalogStubConfig::default().with_search(
        "dune",
        vec![serde_json::json!({
            "key": "/works/OL893415W",
            "title": "Dune",
            "author_name": ["Frank Herbert"]
        })],
    ));

    booknook(temp.path(), &stub)
        .arg("shell")
        .write_stdin("dune\n1\ns\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("by Frank Herbert"))
        .stdout(predicate::str::contains("[saved] Remove from favorites"));

    assert_eq!(saved_keys(temp.path())?, vec!["/works/OL893415W"]);
    assert_eq!(stub.detail_requests(), 0);
    Ok(())
}
