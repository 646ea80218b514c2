//! Build script for stryke-simulator
//!
//! With the `sdl` feature on Windows, links against `vendor/sdl2` and copies
//! SDL2.dll next to the binary. Headless builds need nothing.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_SDL");

    if env::var_os("CARGO_FEATURE_SDL").is_none() {
        return;
    }
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(root) = manifest_dir.parent() else {
        return;
    };
    let vendor_sdl2 = root.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!(
            "cargo:warning=SDL2 vendor directory not found at {}; put SDL2.lib and SDL2.dll there",
            vendor_sdl2.display()
        );
        return;
    }
    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    // OUT_DIR is target/<profile>/build/stryke-simulator-<hash>/out
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(profile_dir) = out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
    else {
        return;
    };

    let dll_src = vendor_sdl2.join("SDL2.dll");
    let dll_dst = profile_dir.join("SDL2.dll");
    if dll_src.exists() && !dll_dst.exists() {
        match fs::copy(&dll_src, &dll_dst) {
            Ok(_) => println!("cargo:warning=Copied SDL2.dll to {}", dll_dst.display()),
            Err(e) => println!("cargo:warning=Failed to copy SDL2.dll: {e}"),
        }
    }
}
