use super::*;
use std::collections::HashMap;

fn parse(pairs: &[(&str, &str)]) -> ServerConfig {
    let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
    ServerConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()))
}

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = parse(&[]);
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.corpus_path, PathBuf::from("tinytweets.json"));
    assert_eq!(cfg.corpus_field, "full_text");
    assert_eq!(cfg.top_k, 20);
}

#[test]
fn overrides_are_read_and_trimmed() {
    let cfg = parse(&[
        ("PORT", "8080"),
        ("CORPUS_PATH", "/data/tweets.json"),
        ("CORPUS_FIELD", " text "),
        ("QUERY_TOP_K", "5"),
    ]);
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.corpus_path, PathBuf::from("/data/tweets.json"));
    assert_eq!(cfg.corpus_field, "text");
    assert_eq!(cfg.top_k, 5);
}

#[test]
fn invalid_values_fall_back() {
    let cfg = parse(&[("PORT", "not-a-port"), ("CORPUS_FIELD", "   "), ("QUERY_TOP_K", "0")]);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.corpus_field, DEFAULT_CORPUS_FIELD);
    assert_eq!(cfg.top_k, DEFAULT_QUERY_TOP_K);
}

#[test]
fn port_out_of_range_falls_back() {
    assert_eq!(parse(&[("PORT", "70000")]).port, DEFAULT_PORT);
}
