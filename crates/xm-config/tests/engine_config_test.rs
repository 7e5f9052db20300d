//! Engine wire-config generation: verbatim settings, exact identifiers,
//! and cross-inbound isolation.

use xm_config::{to_engine_config, validate_inbounds, Inbound, Protocol};

fn mtproto_inbound() -> Inbound {
    Inbound {
        protocol: Protocol::Mtproto,
        settings: r#"{"users":[{"secret":"00112233445566778899aabbccddeeff"}]}"#.to_string(),
        listen: "0.0.0.0".to_string(),
        port: 443,
        tag: "inbound-443".to_string(),
    }
}

fn vmess_inbound() -> Inbound {
    Inbound {
        protocol: Protocol::Vmess,
        settings: r#"{"clients":[{"id":"7a71395e-b7dd-4cc5-87dd-0dd7f4c7602d","email":"test@example.com"}]}"#
            .to_string(),
        listen: "0.0.0.0".to_string(),
        port: 1443,
        tag: "inbound-1443".to_string(),
    }
}

#[test]
fn generation_does_not_leak_across_inbounds() -> anyhow::Result<()> {
    let mtproto = mtproto_inbound();
    let vmess = vmess_inbound();

    let mt_cfg = to_engine_config(&mtproto)?;
    let vm_cfg = to_engine_config(&vmess)?;

    assert_eq!(mt_cfg.protocol, Protocol::Mtproto);
    assert!(mt_cfg
        .settings
        .get()
        .contains(r#""secret":"00112233445566778899aabbccddeeff""#));
    assert_eq!(mt_cfg.tag, "inbound-443");

    assert_eq!(vm_cfg.protocol, Protocol::Vmess);
    assert!(vm_cfg.settings.get().contains(r#""clients""#));
    assert!(!vm_cfg.settings.get().contains("secret"));
    assert_eq!(vm_cfg.tag, "inbound-1443");
    Ok(())
}

#[test]
fn generation_order_does_not_matter() -> anyhow::Result<()> {
    let mtproto = mtproto_inbound();
    let vmess = vmess_inbound();

    // Forward order.
    let mt_first = to_engine_config(&mtproto)?;
    let vm_second = to_engine_config(&vmess)?;
    // Reverse order against fresh values.
    let vm_first = to_engine_config(&vmess_inbound())?;
    let mt_second = to_engine_config(&mtproto_inbound())?;

    assert_eq!(mt_first.settings.get(), mt_second.settings.get());
    assert_eq!(vm_second.settings.get(), vm_first.settings.get());
    assert_eq!(mt_first.protocol, mt_second.protocol);
    assert_eq!(vm_first.protocol, vm_second.protocol);
    Ok(())
}

#[test]
fn settings_bytes_are_carried_verbatim() -> anyhow::Result<()> {
    // Deliberately odd spacing: pass-through must not reformat.
    let settings = r#"{ "clients" : [ ] }"#;
    let inbound = Inbound {
        protocol: Protocol::Shadowsocks,
        settings: settings.to_string(),
        listen: "::".to_string(),
        port: 8388,
        tag: "ss".to_string(),
    };
    let cfg = to_engine_config(&inbound)?;
    assert_eq!(cfg.settings.get(), settings);
    Ok(())
}

#[test]
fn wire_json_uses_engine_field_names() -> anyhow::Result<()> {
    let cfg = to_engine_config(&mtproto_inbound())?;
    let wire = serde_json::to_string(&cfg)?;

    assert!(wire.contains(r#""protocol":"mtproto""#));
    assert!(wire.contains(r#""listen":"0.0.0.0""#));
    assert!(wire.contains(r#""port":443"#));
    assert!(wire.contains(r#""tag":"inbound-443""#));
    assert!(wire.contains(r#""settings":{"users""#));
    Ok(())
}

#[test]
fn identifier_strings_match_the_engine() {
    let cases = [
        (Protocol::Mtproto, "mtproto"),
        (Protocol::Vmess, "vmess"),
        (Protocol::Vless, "vless"),
        (Protocol::DokodemoDoor, "dokodemo-door"),
    ];
    for (protocol, want) in cases {
        assert_eq!(protocol.as_str(), want);
    }
}

#[test]
fn inbound_method_delegates_to_presentation() -> anyhow::Result<()> {
    let inbound = vmess_inbound();
    let via_method = inbound.engine_config()?;
    let via_free_fn = to_engine_config(&inbound)?;
    assert_eq!(via_method.settings.get(), via_free_fn.settings.get());
    Ok(())
}

#[test]
fn inbound_lists_with_distinct_tags_validate() -> anyhow::Result<()> {
    validate_inbounds(&[mtproto_inbound(), vmess_inbound()])?;
    Ok(())
}
