//! # Localization Tests

use anyhow::Result;
use number_lookup_bot::localization::{
    create_localization_manager, detect_language, t_args_lang, t_lang,
};

#[test]
fn test_english_bundle_loads() -> Result<()> {
    let manager = create_localization_manager()?;
    assert!(manager.is_language_supported("en"));
    assert!(!manager.is_language_supported("xx"));
    Ok(())
}

#[test]
fn test_detect_language_falls_back_to_english() -> Result<()> {
    let manager = create_localization_manager()?;

    assert_eq!(detect_language(&manager, Some("en-GB")), "en");
    assert_eq!(detect_language(&manager, Some("hi")), "en");
    assert_eq!(detect_language(&manager, None), "en");
    Ok(())
}

#[test]
fn test_unsupported_language_uses_english_text() -> Result<()> {
    let manager = create_localization_manager()?;

    assert_eq!(
        t_lang(&manager, "operation-cancelled", Some("hi")),
        "❌ Operation cancelled."
    );
    Ok(())
}

#[test]
fn test_arguments_are_interpolated_without_isolation_marks() -> Result<()> {
    let manager = create_localization_manager()?;

    let message = t_args_lang(
        &manager,
        "searching-phone",
        &[("identifier", "9876543210")],
        None,
    );

    assert_eq!(message, "🔍 Searching phone: 9876543210...");
    assert!(!message.contains('\u{2068}'));
    Ok(())
}

#[test]
fn test_missing_key_is_reported() -> Result<()> {
    let manager = create_localization_manager()?;
    assert_eq!(
        t_lang(&manager, "no-such-key", None),
        "Missing translation: no-such-key"
    );
    Ok(())
}
