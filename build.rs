use shadow_rs::ShadowBuilder;

fn main() {
    // Embeds build metadata (PKG_VERSION, CLAP_LONG_VERSION) consumed by
    // the CLI version flags.
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
