//! Library integration tests.

use envpull::config::ResolutionState;
use envpull::env::{compare, parse, render, serialize, EnvSnapshot};
use envpull::remote::{MemoryStore, RemoteObjectStore};
use envpull::resolution::{resolve, Origin, Resolution, ResolutionRequest, ResolvedTarget};
use envpull::EnvpullError;

#[test]
fn error_types_are_public() {
    let err = EnvpullError::SourceExists {
        name: "simon".into(),
    };
    assert!(err.to_string().contains("simon"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> envpull::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use envpull::cli::{Cli, Commands};

    let cli = Cli::parse_from(["envpull", "push", "team", "-e", "prod", "-f", ".env.prod"]);

    if let Some(Commands::Push(args)) = cli.command {
        assert_eq!(args.source.as_deref(), Some("team"));
        assert_eq!(args.env, "prod");
        assert_eq!(args.file.to_str(), Some(".env.prod"));
    } else {
        panic!("Expected Push command");
    }
}

fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
    pairs.iter().copied().collect()
}

#[test]
fn diff_partitions_every_key_exactly_once() {
    let cases = [
        (snapshot(&[]), snapshot(&[])),
        (snapshot(&[("A", "1")]), snapshot(&[])),
        (snapshot(&[]), snapshot(&[("A", "1")])),
        (
            snapshot(&[("A", "1"), ("B", "2"), ("D", "x")]),
            snapshot(&[("B", "3"), ("C", "4"), ("D", "x")]),
        ),
        (
            snapshot(&[("K", ""), ("L", "v")]),
            snapshot(&[("K", " "), ("L", "v")]),
        ),
    ];

    for (local, remote) in &cases {
        let diff = compare(local, remote);
        let mut union: Vec<&str> = local.keys().chain(remote.keys()).collect();
        union.sort_unstable();
        union.dedup();

        for key in &union {
            let hits = [
                diff.added.contains_key(*key),
                diff.removed.contains_key(*key),
                diff.modified.contains_key(*key),
                diff.same.contains_key(*key),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "key {} in {} partitions", key, hits);
        }

        let summary = diff.summary();
        assert_eq!(
            summary.added + summary.removed + summary.modified + summary.unchanged,
            union.len()
        );
    }
}

#[test]
fn swapping_sides_mirrors_the_diff() {
    let local = snapshot(&[("A", "1"), ("B", "2"), ("D", "x")]);
    let remote = snapshot(&[("B", "3"), ("C", "4"), ("D", "x")]);

    let forward = compare(&local, &remote);
    let backward = compare(&remote, &local);

    assert_eq!(forward.added, backward.removed);
    assert_eq!(forward.removed, backward.added);
    assert_eq!(forward.same, backward.same);
    for (key, change) in &forward.modified {
        let mirrored = &backward.modified[key];
        assert_eq!(change.local, mirrored.remote);
        assert_eq!(change.remote, mirrored.local);
    }
}

#[test]
fn diff_of_identical_snapshots_has_no_changes() {
    let env = snapshot(&[("A", "1"), ("B", "two words")]);
    let diff = compare(&env, &env);
    assert!(!diff.has_changes());
    assert_eq!(diff.same.len(), 2);
}

#[test]
fn serialized_snapshot_parses_back() {
    let original = snapshot(&[
        ("PLAIN", "value"),
        ("SPACED", "hello world"),
        ("EMPTY", ""),
        ("URL", "postgres://u:p@host/db?x=1"),
        ("SINGLE", "it's"),
    ]);

    let reparsed = parse(serialize(&original).as_bytes());
    assert_eq!(reparsed, original);
}

#[test]
fn generated_values_survive_serialize_then_parse() {
    let edges = ["", " ", "\t", "\r", "\x0b", "\x0c", "\u{a0}", "\u{2003}", "\u{3000}"];
    let bodies = ["", "x", "a b", "\"q\"", "'s'", "=eq", "#hash", "C:\\path", "a\u{a0}b"];

    let mut original = EnvSnapshot::new();
    let mut n = 0;
    for left in edges {
        for body in bodies {
            for right in edges {
                let value = format!("{}{}{}", left, body, right);
                let single: EnvSnapshot = [("K", value.as_str())].into_iter().collect();
                assert_eq!(
                    parse(serialize(&single).as_bytes()),
                    single,
                    "round trip lost {:?}",
                    value
                );
                original.insert(format!("K{}", n), value);
                n += 1;
            }
        }
    }

    assert_eq!(parse(serialize(&original).as_bytes()), original);
}

#[test]
fn parse_tolerates_messy_files() {
    let env = parse(b"\n  # heading\nexport_less\n=nokey\n A = 1 \nB='x'\nA=2\r\n");
    assert_eq!(env.get("A"), Some("2"));
    assert_eq!(env.get("B"), Some("x"));
    assert_eq!(env.len(), 2);
}

#[test]
fn rendered_report_lists_each_change() {
    let diff = compare(
        &snapshot(&[("A", "1"), ("B", "old")]),
        &snapshot(&[("B", "new"), ("C", "3")]),
    );
    let report = render(&diff);
    assert!(report.contains("+ C=3"));
    assert!(report.contains("- A=1"));
    assert!(report.contains("B"));
}

fn resolved(request: ResolutionRequest, cache: ResolutionState) -> ResolvedTarget {
    match resolve(&request, &cache) {
        Resolution::Resolved(target) => target,
        Resolution::Failed(reason) => panic!("unexpected failure: {:?}", reason),
    }
}

#[test]
fn resolution_precedence() {
    // (source arg, --env, cached source, cached env) -> (source, env)
    let cases = [
        (Some("team"), "default", "simon", "prod", ("team", "default")),
        (Some("simon"), "default", "simon", "prod", ("simon", "prod")),
        (None, "default", "simon", "prod", ("simon", "prod")),
        (None, "develop", "simon", "prod", ("simon", "develop")),
        (Some("simon"), "staging", "simon", "prod", ("simon", "staging")),
        (None, "default", "simon", "", ("simon", "default")),
    ];

    for (source, env, cached_source, cached_env, expected) in cases {
        let target = resolved(
            ResolutionRequest::new(source, env),
            ResolutionState::new(cached_source, cached_env),
        );
        assert_eq!(
            (target.source.as_str(), target.environment.as_str()),
            expected,
            "source={:?} env={}",
            source,
            env
        );
    }
}

#[test]
fn resolution_reports_origins() {
    let target = resolved(
        ResolutionRequest::new(None, "default"),
        ResolutionState::new("simon", "prod"),
    );
    assert_eq!(target.source_origin, Origin::Cached);
    assert_eq!(target.environment_origin, Origin::Cached);

    let target = resolved(
        ResolutionRequest::new(Some("team"), "default"),
        ResolutionState::default(),
    );
    assert_eq!(target.source_origin, Origin::Explicit);
    assert_eq!(target.environment_origin, Origin::Default);
}

#[test]
fn resolution_without_source_fails_with_usage() {
    let outcome = resolve(
        &ResolutionRequest::new(Some(""), "prod"),
        &ResolutionState::default(),
    );
    let err = outcome.into_result("envpull pull <source>").unwrap_err();
    assert!(matches!(err, EnvpullError::NoSourceAvailable { .. }));
    assert!(err.to_string().contains("envpull pull <source>"));
}

#[test]
fn memory_store_behaves_like_a_bucket() {
    let store = MemoryStore::new();
    store.put("gs://my-envs", "api", "prod", b"A=1\n").unwrap();
    store.put("my-envs", "api", "default", b"B=2\n").unwrap();
    store.put("my-envs", "web", "prod", b"C=3\n").unwrap();

    assert_eq!(store.get("my-envs/", "api", "prod").unwrap(), b"A=1\n");
    assert_eq!(
        store.list("gs://my-envs", "api").unwrap(),
        vec!["default".to_string(), "prod".to_string()]
    );
    assert!(store.exists("my-envs", "web", "prod").unwrap());
    assert!(matches!(
        store.get("my-envs", "api", "staging"),
        Err(EnvpullError::RemoteObjectNotFound { .. })
    ));
}
