fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // Pass through EDEN_GIT_HASH from packaged builds without a .git directory
    println!("cargo:rerun-if-env-changed=EDEN_GIT_HASH");
    if let Ok(hash) = std::env::var("EDEN_GIT_HASH") {
        println!("cargo:rustc-env=EDEN_GIT_HASH={}", hash);
    }
}
