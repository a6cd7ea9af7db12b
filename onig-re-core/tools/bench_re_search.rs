use onig_re_core::match_engine::search_batch;
use onig_re_core::{init, make_re_with, re_search, Backend, EngineConfig};
use std::time::Instant;

fn main() {
    init();
    let pattern = "module([0-9]{3})/file_[0-9]{3}\\.rs";
    let text = (0..2000).map(|i| format!("/home/user/projects/repo/src/modülé{}/file_{}.rs\n", i, i)).collect::<String>()
        + "/src/module123/file_456.rs";

    for backend in [Backend::Onig, Backend::Regex, Backend::Pcre2] {
        println!("[{}] compiling pattern: {}", backend, pattern);
        let re = match make_re_with(pattern, &EngineConfig::new(backend)) {
            Ok(re) => re,
            Err(e) => {
                eprintln!("[{}] {}: {}", backend, e, e.detail());
                continue;
            }
        };

        let iters = 2000;
        let start = Instant::now();
        let mut last = None;
        for _ in 0..iters {
            last = re_search(&re, &text).ok();
        }
        let dur = start.elapsed();
        println!("[{}] {} searches, avg {:?}, match {:?}", backend, iters, dur / iters, last.and_then(|m| m.whole()));
    }

    let re = make_re_with("ab([0-9]+)", &EngineConfig::default()).expect("compile");
    let subjects: Vec<String> = (0..50000).map(|i| format!("xxab{}yy", i)).collect();
    println!("batch: {} subjects (par_iter)", subjects.len());
    let start = Instant::now();
    let results = search_batch(&re, &subjects);
    let dur = start.elapsed();
    let matched = results.iter().filter(|r| matches!(r, Ok(m) if m.is_match())).count();
    println!("elapsed: {:?}, avg per subject: {:?}, matched {}", dur, dur / subjects.len() as u32, matched);
}
