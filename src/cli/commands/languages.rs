use crate::translation::{CapabilityLookup, DeepLCapabilities, language_name};
use crate::ui::Style;

/// Prints every catalog language DeepL can translate into, with its DeepL codes.
pub fn print_languages() {
    let capabilities = DeepLCapabilities;

    println!("{}", Style::header("Supported languages"));
    for code in capabilities.codes() {
        let Some(capability) = capabilities.lookup_exact(code) else {
            continue;
        };
        let formality = if capability.supports_formality {
            Style::hint("formality")
        } else {
            String::new()
        };
        println!(
            "  {} {:<26} {:<4} → {:<8} {formality}",
            Style::code(format!("{code:<8}")),
            language_name(code),
            capability.source_code,
            capability.target_code,
        );
    }
}
