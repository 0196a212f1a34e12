//! Build script for symctx-core
//!
//! Checks the toolchain before compilation:
//! - Minimum Rust version (`let ... else` and `Option::is_some_and` need
//!   Rust 1.70.0+)
//!
//! ## Requirements
//!
//! - **Rust**: 1.70.0 or newer, Edition 2021

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    let Ok(min_rust_version) = rustc_version::Version::parse("1.70.0") else {
        println!("cargo:warning=could not parse minimum Rust version");
        return;
    };

    match rustc_version::version() {
        Ok(found) if found < min_rust_version => {
            panic!("symctx-core requires Rust {min_rust_version} or newer, found {found}");
        }
        Ok(_) => {}
        Err(_) => {
            // Some build environments hide rustc; don't fail the build over it
            println!("cargo:warning=could not verify Rust version");
        }
    }
}
