//! End to end tests for building Thumbor URLs through the public API.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use thumbsign_core::{Context, ErrorKind, StaticEnv};
use thumbsign_thumbor::{Command, Config, Dimension, Thumbor, ThumborUrl};

const SERVER: &str = "http://thumbor.example.com";
const IMAGE: &str = "https://example.com/images/test.jpg";

fn init_thumbor(secret: Option<&str>) -> Thumbor {
    let _ = env_logger::builder().is_test(true).try_init();

    Thumbor::new(SERVER, secret.map(String::from))
}

#[test]
fn test_unsafe_url_without_commands() {
    let url = init_thumbor(None).url(IMAGE).to_string();
    assert_eq!(
        url,
        "http://thumbor.example.com/unsafe/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_unsafe_url_with_commands() {
    let builder = init_thumbor(None)
        .url(IMAGE)
        .fit_in(640, 480)
        .smart_crop(true)
        .quality(80);

    assert_eq!(
        builder.commands().to_segments().join("/"),
        "fit-in/640x480/smart/filters:quality(80)"
    );
    assert_eq!(
        builder.to_string(),
        "http://thumbor.example.com/unsafe/fit-in/640x480/smart/filters:quality(80)/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_empty_secret_is_unsafe() {
    let url = init_thumbor(Some("")).url(IMAGE).fit_in(640, 480).to_string();
    assert_eq!(
        url,
        "http://thumbor.example.com/unsafe/fit-in/640x480/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_signed_url() {
    let url = init_thumbor(Some("my-secret-key"))
        .url(IMAGE)
        .fit_in(640, 480)
        .smart_crop(true)
        .add_filter("quality", [80])
        .to_string();

    assert_eq!(
        url,
        "http://thumbor.example.com/l6tnpNeJKjUqGfavGnSaBb-ELSs=/fit-in/640x480/smart/filters:quality(80)/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_signature_covers_path_only() {
    let thumbor = init_thumbor(Some("my-secret-key"));
    let url = thumbor.url(IMAGE).fit_in(640, 480).smart_crop(true).quality(80);

    let signed = url.build();
    assert_eq!(
        signed.path(),
        "fit-in/640x480/smart/filters:quality(80)/https://example.com/images/test.jpg"
    );
    assert_eq!(
        signed.to_string(),
        format!(
            "{SERVER}/{}/{}",
            ThumborUrl::sign(&signed.path(), "my-secret-key"),
            signed.path()
        )
    );
}

#[test]
fn test_segment_order() {
    let url = init_thumbor(None)
        .url(IMAGE)
        .brightness(10)
        .smart_crop(true)
        .valign("middle")
        .halign("center")
        .flip_horizontal(true)
        .full_fit_in(300, 200)
        .crop(0, 0, 500, 400)
        .trim(Some("top-left"), Some(20))
        .metadata_only(true)
        .contrast(5)
        .to_string();

    assert_eq!(
        url,
        "http://thumbor.example.com/unsafe/meta/trim:top-left:20/0x0:500x400/full-fit-in/-300x200/center/middle/smart/filters:brightness(10):contrast(5)/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_flip_plain_resize() {
    let url = init_thumbor(None)
        .url(IMAGE)
        .resize(Dimension::Orig, 480)
        .flip_horizontal(true)
        .flip_vertical(true)
        .to_string();
    assert_eq!(
        url,
        "http://thumbor.example.com/unsafe/origx-480/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_clones_diverge() {
    let base = init_thumbor(None).url(IMAGE).fit_in(640, 480);
    let with_quality = base.clone().quality(80);
    let with_webp = base.clone().webp();

    assert_eq!(
        base.to_string(),
        "http://thumbor.example.com/unsafe/fit-in/640x480/https://example.com/images/test.jpg"
    );
    assert_eq!(
        with_quality.to_string(),
        "http://thumbor.example.com/unsafe/fit-in/640x480/filters:quality(80)/https://example.com/images/test.jpg"
    );
    assert_eq!(
        with_webp.to_string(),
        "http://thumbor.example.com/unsafe/fit-in/640x480/filters:format(webp)/https://example.com/images/test.jpg"
    );
}

#[test]
fn test_apply_and_call() {
    let thumbor = init_thumbor(None);

    let typed = thumbor
        .url(IMAGE)
        .apply(Command::FitIn {
            width: 800,
            height: 600,
        })
        .apply(Command::Brightness(50));
    let parsed = thumbor
        .url(IMAGE)
        .call("fit_in(800, 600)")
        .and_then(|b| b.call("brightness(50)"))
        .expect("commands must parse");

    assert_eq!(typed.to_string(), parsed.to_string());

    let err = thumbor.url(IMAGE).call("invalid_method()").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperation);
}

#[test]
fn test_thumbor_from_env() {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from_iter([
            ("THUMBOR_SERVER".to_string(), "http://thumbor.example.com/".to_string()),
            ("THUMBOR_KEY".to_string(), "test-secret-key".to_string()),
        ]),
    });
    let thumbor = Thumbor::from_config(Config::new().from_env(&ctx)).expect("config must be valid");
    assert!(thumbor.has_secret());
    assert_eq!(thumbor.server(), "http://thumbor.example.com/");

    let url = thumbor.url(IMAGE).fit_in(800, 600).to_string();
    assert_eq!(
        url,
        "http://thumbor.example.com/yu6kmglg2ziYhhUqOC1TnxvsVIM=/fit-in/800x600/https://example.com/images/test.jpg"
    );
}
