use std::path::Path;

use super::*;

#[test]
fn import_uses_default_paths() {
    let cli = Cli::try_parse_from(["storefront-cli", "import"]).expect("expected valid cli args");

    let Commands::Import {
        source,
        destination,
    } = cli.command
    else {
        panic!("expected import command");
    };
    assert_eq!(source, Path::new("./assets/products/products.json.gz"));
    assert_eq!(destination, Path::new("./products.db"));
}

#[test]
fn import_accepts_path_overrides() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "import",
        "--source",
        "/tmp/feed.json.gz",
        "--destination",
        "/tmp/catalog.db",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Import { ref source, ref destination }
            if source == Path::new("/tmp/feed.json.gz")
                && destination == Path::new("/tmp/catalog.db")
    ));
}

#[test]
fn locate_requires_a_name() {
    assert!(Cli::try_parse_from(["storefront-cli", "locate"]).is_err());
}

#[test]
fn locate_parses_region_and_name() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "locate",
        "--region",
        "europe-west1",
        "--name",
        "product",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Locate { ref name, region: Some(ref region), timeout_secs: 30, .. }
            if name == "product" && region == "europe-west1"
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["storefront-cli"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn region_flag_wins_over_alias() {
    let region = locate::region_or_alias(Some("europe-west1".to_owned()), |_| {
        Some("us-central1".to_owned())
    });
    assert_eq!(region.as_deref(), Some("europe-west1"));
}

#[test]
fn cloud_run_region_fills_missing_region() {
    let region = locate::region_or_alias(None, |key| {
        (key == "CLOUD_RUN_REGION").then(|| "us-central1".to_owned())
    });
    assert_eq!(region.as_deref(), Some("us-central1"));
}

#[test]
fn empty_region_values_count_as_unset() {
    let region = locate::region_or_alias(Some(String::new()), |_| Some("  ".to_owned()));
    assert_eq!(region, None);
}
