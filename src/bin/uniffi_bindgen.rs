//! UniFFI bindgen CLI tool for generating language bindings.
//!
//! Generates Swift and Kotlin bindings for the garden-recipes library, so
//! mobile companion apps can browse the same catalog.
//!
//! ## Usage
//!
//! ```bash
//! cargo build --release
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libgarden_recipes.so --language swift --out-dir ./bindings
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/libgarden_recipes.so --language kotlin --out-dir ./bindings
//! ```

fn main() {
    uniffi::uniffi_bindgen_main()
}
