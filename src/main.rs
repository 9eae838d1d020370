//! Host-side helper: `cargo run` compiles the WASM bundle into
//! `static/pkg` and serves the assembled site locally.

use std::process::{Command, Stdio};

fn main() {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors; the served site may be stale.");
        }
        Err(_) => {
            eprintln!(
                "wasm-pack not found in PATH. Install it first (https://rustwasm.github.io/wasm-pack/)."
            );
            std::process::exit(1);
        }
    }

    println!("Serving http://127.0.0.1:8080 …");
    match Command::new("python3")
        .args(["-m", "http.server", "8080", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
    {
        Ok(mut server) => {
            let _ = server.wait();
        }
        Err(e) => {
            eprintln!("failed to start http server: {e}");
            std::process::exit(1);
        }
    }
}
