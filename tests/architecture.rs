//! Architecture Verification Suite
//! 
//! Keeps the stage boundaries honest: errors travel through `anyhow`,
//! configuration is plain data, and no stage needs global state.

#[cfg(test)]
mod architecture_tests {
    use ssp_dataprep::{DataPaths, DataPrepError, RunConfig, RunReport};

    // 1. ERRORS: library errors must convert into anyhow::Error for the binaries
    #[test]
    fn test_errors_are_thread_safe() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<DataPrepError>();

        let err: anyhow::Error = DataPrepError::InvalidArgument {
            name: "step",
            message: "must be > 0".to_string(),
        }
        .into();
        assert!(err.downcast_ref::<DataPrepError>().is_some());
    }

    // 2. DATA: configuration and layout are owned values, shareable across threads
    #[test]
    fn test_stage_inputs_are_plain_data() {
        fn assert_send_sync_clone<T: Send + Sync + Clone>() {}
        assert_send_sync_clone::<RunConfig>();
        assert_send_sync_clone::<DataPaths>();
        assert_send_sync_clone::<RunReport>();
    }

    // 3. NO AMBIENT STATE: building a configuration never reads the process environment
    #[test]
    fn test_config_from_lookup_only() {
        let config = RunConfig::from_lookup(|key| match key {
            "SSP" => Some("ssp1".to_string()),
            "COUNTRY" => Some("Rwanda".to_string()),
            "LEVEL" => Some("2".to_string()),
            "LAD_NAME" => Some("NAME_2".to_string()),
            "LAD_CODE" => Some("GID_2".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.data_root, std::path::PathBuf::from("/data"));
        assert_eq!(config.title(), "Rwanda - SSP1");
    }

    // 4. REPORT: a run summary serializes for logging
    #[test]
    fn test_report_is_serializable() {
        fn assert_serialize<T: serde::Serialize>() {}
        assert_serialize::<RunReport>();
    }
}
