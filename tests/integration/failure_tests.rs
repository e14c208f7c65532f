//! Failure paths: handler rejection, source errors and early closure

#[cfg(test)]
mod tests {
    use crate::common::{EventLog, FlowEvent, LoggingHandler, ScriptedSource};
    use stream_batcher::{BatchError, BatchOptions, Payload, Signal, stream_batch};

    fn options(batch_size: usize) -> BatchOptions {
        BatchOptions::new().with_batch_size(batch_size)
    }

    #[tokio::test]
    async fn test_handler_rejection_stops_without_resume() {
        let log = EventLog::new();
        let mut source = ScriptedSource::items((1..=8).collect::<Vec<u32>>(), log.clone());
        let mut handler = LoggingHandler::new(log.clone()).failing_at(4);

        let error = stream_batch(&mut source, &mut handler, options(2))
            .await
            .unwrap_err();

        assert!(matches!(error, BatchError::Handler { count: 4, .. }));
        assert!(error.to_string().contains("refusing batch at 4"));
        assert_eq!(
            log.events(),
            vec![
                FlowEvent::Pause,
                FlowEvent::Batch {
                    items: vec!["1".into(), "2".into()],
                    total: 2
                },
                FlowEvent::Resume,
                FlowEvent::Pause,
            ]
        );
        // items 5..=8 and the end signal are never read
        assert_eq!(source.remaining(), 5);
    }

    #[tokio::test]
    async fn test_remainder_rejection_reports_final_count() {
        let log = EventLog::new();
        let mut source = ScriptedSource::items(vec![1, 2, 3], log.clone());
        let mut handler = LoggingHandler::new(log.clone()).failing_at(3);

        let error = stream_batch(&mut source, &mut handler, options(2))
            .await
            .unwrap_err();

        assert_eq!(error.count(), Some(3));
        assert_eq!(log.count(&FlowEvent::Pause), 1);
        assert_eq!(log.count(&FlowEvent::Resume), 1);
    }

    #[tokio::test]
    async fn test_source_error_discards_buffered_items() {
        let log = EventLog::new();
        let mut source = ScriptedSource::new(
            vec![
                Signal::data(1),
                Signal::data(2),
                Signal::error("disk unplugged"),
                Signal::data(3),
                Signal::end(),
            ],
            log.clone(),
        );
        let mut handler = LoggingHandler::new(log.clone());

        let error = stream_batch(&mut source, &mut handler, options(5))
            .await
            .unwrap_err();

        match error {
            BatchError::Source { count, source } => {
                assert_eq!(count, 2);
                assert_eq!(source.to_string(), "disk unplugged");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(log.events().is_empty());
    }

    #[tokio::test]
    async fn test_source_error_after_flushed_batches() {
        let log = EventLog::new();
        let mut source = ScriptedSource::new(
            vec![
                Signal::data("a"),
                Signal::data("b"),
                Signal::data("c"),
                Signal::error("reset by peer"),
            ],
            log.clone(),
        );
        let mut handler = LoggingHandler::new(log.clone());

        let error = stream_batch(&mut source, &mut handler, options(2))
            .await
            .unwrap_err();

        assert_eq!(error.count(), Some(3));
        assert_eq!(log.batches(), vec![(vec!["a".to_string(), "b".to_string()], 2)]);
    }

    #[tokio::test]
    async fn test_data_signal_without_item_is_rejected() {
        let log = EventLog::new();
        let mut source: ScriptedSource<u32> =
            ScriptedSource::new(vec![Signal::new("data", Payload::Empty)], log.clone());
        let mut handler = LoggingHandler::new(log);

        let error = stream_batch(&mut source, &mut handler, options(2))
            .await
            .unwrap_err();
        assert!(matches!(error, BatchError::Signal { ref event, .. } if event == "data"));
    }

    #[tokio::test]
    async fn test_script_exhausted_without_end() {
        let log = EventLog::new();
        let mut source = ScriptedSource::new(vec![Signal::data(1), Signal::data(2)], log.clone());
        let mut handler = LoggingHandler::new(log.clone());

        let error = stream_batch(&mut source, &mut handler, options(10))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            BatchError::SourceClosed { count: 2, ref end_event } if end_event == "end"
        ));
        assert!(log.batches().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_touch_nothing() {
        let log = EventLog::new();
        let mut source = ScriptedSource::items(vec![1, 2, 3], log.clone());
        let mut handler = LoggingHandler::new(log.clone());

        let error = stream_batch(&mut source, &mut handler, options(0))
            .await
            .unwrap_err();

        assert!(error.is_config());
        assert!(log.events().is_empty());
        assert_eq!(source.remaining(), 4);
    }
}
