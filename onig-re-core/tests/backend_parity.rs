use onig_re_core::{make_re_with, re_search, Backend, EngineConfig, MatchResult};

// Patterns written in the syntax all three engines share.
const CASES: &[(&str, &str)] = &[
    ("(ab)([0-9]+)", "xxab123yy"),
    ("a(x)?b", "zab"),
    ("[a-z]+", "123 hello 456"),
    ("\\d{2,3}", "a1b2345c"),
    ("(?i)hello", "say HELLO"),
    ("^\\s*$", "   "),
    ("(\\w+)@(\\w+)\\.com", "mail bob@example.com now"),
    ("é|ü", "naïve über"),
];

fn search(backend: Backend, pattern: &str, subject: &str) -> MatchResult {
    let re = make_re_with(pattern, &EngineConfig::new(backend)).unwrap();
    re_search(&re, subject).unwrap()
}

#[test]
fn backends_report_identical_ranges() {
    for &(pattern, subject) in CASES {
        let onig = search(Backend::Onig, pattern, subject);
        let rust = search(Backend::Regex, pattern, subject);
        let pcre = search(Backend::Pcre2, pattern, subject);
        assert_eq!(onig, rust, "onig vs regex: {:?} on {:?}", pattern, subject);
        assert_eq!(onig, pcre, "onig vs pcre2: {:?} on {:?}", pattern, subject);
    }
}

#[test]
fn case_insensitive_config_applies_to_every_backend() {
    for backend in [Backend::Onig, Backend::Regex, Backend::Pcre2] {
        let cfg = EngineConfig::new(backend).case_insensitive(true);
        let re = make_re_with("hello", &cfg).unwrap();
        let res = re_search(&re, "say HeLLo").unwrap();
        assert_eq!(res.group_text("say HeLLo", 0), Some("HeLLo"), "{}", backend);
    }
}
