fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use sideload_protocol::{Dialect, PeerMessage, classify, wire};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file as raw text, exactly as it would arrive
    /// off the wire.
    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    // -----------------------------------------------------------------
    // Inbound: every structured peer reply must classify to its tag.
    // -----------------------------------------------------------------

    #[test]
    fn connected_fixture_classifies() {
        let msg = classify(&load_fixture("connected.json"));
        assert_eq!(
            msg,
            PeerMessage::Connected {
                message: Some("Device ready for update".into())
            }
        );
    }

    #[test]
    fn ready_fixture_classifies() {
        assert_eq!(classify(&load_fixture("ready.json")).tag(), "ready");
    }

    #[test]
    fn progress_fixture_carries_numeric_fields() {
        let msg = classify(&load_fixture("progress.json"));
        assert_eq!(
            msg,
            PeerMessage::Progress {
                message: None,
                progress: Some(42),
                received: Some(4_390_912),
                total: Some(10_485_760),
            }
        );
    }

    #[test]
    fn broadcast_fixture_classifies() {
        assert_eq!(classify(&load_fixture("broadcast.json")).tag(), "broadcast");
    }

    #[test]
    fn success_fixture_classifies() {
        assert_eq!(classify(&load_fixture("success.json")).tag(), "success");
    }

    #[test]
    fn error_fixture_carries_reason() {
        let msg = classify(&load_fixture("error.json"));
        assert_eq!(
            msg,
            PeerMessage::Error {
                message: Some("File size mismatch".into())
            }
        );
    }

    // -----------------------------------------------------------------
    // Outbound: generated frames must match the fixtures value-for-value.
    // -----------------------------------------------------------------

    #[test]
    fn file_info_matches_fixture() {
        let generated = wire::file_info(
            Dialect::Json,
            "app-debug.apk",
            10_485_760,
            Some("5eb63bbbe01eeed093cb22bb8f5acdc3"),
        )
        .unwrap();

        let generated: serde_json::Value = serde_json::from_str(&generated).unwrap();
        let fixture: serde_json::Value =
            serde_json::from_str(&load_fixture("file_info.json")).unwrap();
        assert_eq!(generated, fixture);
    }

    #[test]
    fn transfer_complete_matches_fixture() {
        let generated = wire::transfer_complete(Dialect::Json).unwrap();
        let generated: serde_json::Value = serde_json::from_str(&generated).unwrap();
        let fixture: serde_json::Value =
            serde_json::from_str(&load_fixture("transfer_complete.json")).unwrap();
        assert_eq!(generated, fixture);
    }

    // -----------------------------------------------------------------
    // Legacy dialect: plain-text lines, no fixtures needed.
    // -----------------------------------------------------------------

    #[test]
    fn legacy_lines_roundtrip_through_the_classifier() {
        use sideload_protocol::{LegacyReply, parse_legacy};

        // The legacy peer sends bare tokens; they must surface
        // verbatim as unknown, then map through parse_legacy.
        let msg = classify("TRANSFER_SUCCESS");
        let PeerMessage::Unknown { text } = msg else {
            panic!("expected unknown");
        };
        assert_eq!(parse_legacy(&text), Some(LegacyReply::Success));

        let msg = classify("COMMAND_ERROR:Invalid file info format");
        let PeerMessage::Unknown { text } = msg else {
            panic!("expected unknown");
        };
        assert_eq!(
            parse_legacy(&text),
            Some(LegacyReply::Error("Invalid file info format".into()))
        );
    }

    #[test]
    fn legacy_outbound_framing() {
        assert_eq!(
            wire::file_info(Dialect::Legacy, "app-debug.apk", 10_485_760, None).unwrap(),
            "FILE_INFO:app-debug.apk:10485760"
        );
        assert_eq!(
            wire::transfer_complete(Dialect::Legacy).unwrap(),
            "TRANSFER_COMPLETE"
        );
    }
}
