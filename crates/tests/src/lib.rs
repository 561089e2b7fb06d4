//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract schema smoke tests
//! - Synthetic capture through engine and store dispatcher
//! - Replay file round trips

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;

    use contracts::{
        EngineConfig, ImuSample, Session, SessionStore, StoreConfig, StoreType, Vector3,
        STANDARD_GRAVITY,
    };
    use motion_engine::MotionEngine;
    use session_store::{create_dispatcher, FileStore, FileStoreConfig};
    use tokio::sync::mpsc;

    const RATE_HZ: f64 = 100.0;

    /// One full synthetic capture: 2.5s rest, a 0.5s throw burst with
    /// spin around z, then 3s rest so the engine settles and finalizes.
    ///
    /// Accel is in g (gravity on z), gyro in deg/s, both at 100 Hz.
    fn synthetic_capture() -> Vec<ImuSample> {
        let dt = 1.0 / RATE_HZ;
        let burst_start = 2.5;
        let burst_len = 0.5;
        let total = 6.0;
        let peak_accel_g = 2.45 / STANDARD_GRAVITY;
        let peak_spin_dps = 600.0;

        let mut samples = Vec::new();
        let mut n = 1u64;
        loop {
            let ts = n as f64 * dt;
            if ts > total {
                break;
            }

            let env = if ts >= burst_start && ts < burst_start + burst_len {
                (std::f64::consts::PI * (ts - burst_start) / burst_len).sin()
            } else {
                0.0
            };

            samples.push(ImuSample::accel(
                "wrist_imu",
                ts,
                env * peak_accel_g,
                0.0,
                1.0,
            ));
            samples.push(ImuSample::gyro("wrist_imu", ts, 0.0, 0.0, env * peak_spin_dps));

            n += 1;
        }
        samples
    }

    /// Run the synthetic capture through a fresh engine, collecting
    /// finalized sessions.
    fn run_capture(samples: &[ImuSample]) -> Vec<Session> {
        let mut engine = MotionEngine::new(EngineConfig::default(), RATE_HZ);
        engine.start().unwrap();

        let mut sessions = Vec::new();
        for sample in samples {
            let outcome = engine.push(sample);
            assert!(outcome.error.is_none(), "engine error: {:?}", outcome.error);
            if let Some(session) = outcome.completed_session {
                sessions.push(session);
            }
        }
        sessions
    }

    #[test]
    fn test_synthetic_capture_produces_one_session() {
        let sessions = run_capture(&synthetic_capture());
        assert_eq!(sessions.len(), 1);

        let session = &sessions[0];
        assert!(session.sample_count > 0);
        assert!(!session.speed_series.is_empty());
        assert!(!session.spin_series.is_empty());

        // Burst onset detected within the burst window
        assert!(session.start_time > 2.5 && session.start_time < 3.0);

        // Peak speed plausible for a 2.45 m/s2 half-sine burst
        assert!(
            session.max_speed_mps > 0.25 && session.max_speed_mps < 1.2,
            "max speed out of band: {}",
            session.max_speed_mps
        );

        // 600 deg/s peak is 100 RPM, smoothing eats a little
        assert!(
            session.max_rpm > 50.0 && session.max_rpm < 105.0,
            "max rpm out of band: {}",
            session.max_rpm
        );
        assert_eq!(session.dominant_axis, Vector3::new(0.0, 0.0, 1.0));
    }

    /// Full chain: engine output fanned out to a file store, then read
    /// back through the same store.
    #[tokio::test]
    async fn test_sessions_reach_file_store() {
        let sessions = run_capture(&synthetic_capture());
        assert_eq!(sessions.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let (session_tx, session_rx) = mpsc::channel(10);

        let mut params = HashMap::new();
        params.insert(
            "base_path".to_string(),
            dir.path().to_string_lossy().into_owned(),
        );
        let configs = vec![StoreConfig {
            name: "files".to_string(),
            store_type: StoreType::File,
            queue_capacity: 10,
            params: params.clone(),
        }];

        let dispatcher = create_dispatcher(configs, session_rx).unwrap();
        let dispatcher_handle = dispatcher.spawn();

        let expected = sessions[0].summary();
        session_tx.send(sessions.into_iter().next().unwrap()).await.unwrap();
        drop(session_tx);

        tokio::time::timeout(std::time::Duration::from_secs(2), dispatcher_handle)
            .await
            .expect("dispatcher timed out")
            .unwrap();

        // Read back through a fresh store instance
        let mut store = FileStore::new(
            "files",
            FileStoreConfig {
                base_path: dir.path().to_path_buf(),
            },
        )
        .unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0], expected);

        let loaded = store.load(&expected.id).await.unwrap();
        assert_eq!(loaded.summary(), expected);
    }

    /// Replaying a recorded capture reproduces the exact same session.
    #[test]
    fn test_replay_reproduces_session() {
        use std::io::Write;

        let samples = synthetic_capture();
        let direct = run_capture(&samples);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        for sample in &samples {
            writeln!(file, "{}", serde_json::to_string(sample).unwrap()).unwrap();
        }
        file.flush().unwrap();

        let replayed_samples = ingestion::load_samples(file.path()).unwrap();
        assert_eq!(replayed_samples.len(), samples.len());

        let replayed = run_capture(&replayed_samples);
        assert_eq!(replayed.len(), direct.len());

        // Ids carry a per-engine run tag and are expected to differ;
        // everything measured must match exactly
        let mut replayed_summary = replayed[0].summary();
        replayed_summary.id = direct[0].summary().id;
        assert_eq!(replayed_summary, direct[0].summary());
        assert_eq!(replayed[0].speed_series, direct[0].speed_series);
        assert_eq!(replayed[0].spin_series, direct[0].spin_series);
    }

    /// Mock feed wired through the ingestion pipeline delivers both
    /// channels to the merged stream.
    #[tokio::test]
    async fn test_mock_feed_through_pipeline() {
        use contracts::SamplePayload;
        use ingestion::{IngestionPipeline, MockFeedConfig, ThrowProfileSource};

        let mut pipeline = IngestionPipeline::new(256);
        pipeline.register_feed(
            "wrist_imu".to_string(),
            Box::new(ThrowProfileSource::new(MockFeedConfig {
                feed_id: "wrist_imu".to_string(),
                ..Default::default()
            })),
            None,
        );

        pipeline.start_all();
        let rx = pipeline.take_receiver().unwrap();

        let mut got_accel = false;
        let mut got_gyro = false;
        let deadline = std::time::Duration::from_secs(2);

        while !(got_accel && got_gyro) {
            let sample = tokio::time::timeout(deadline, rx.recv())
                .await
                .expect("no samples within deadline")
                .expect("channel closed");
            match sample.payload {
                SamplePayload::Accel(_) => got_accel = true,
                SamplePayload::Gyro(_) => got_gyro = true,
            }
        }

        pipeline.stop_all();
        assert!(pipeline.metrics().snapshot().samples_received > 0);
    }
}
