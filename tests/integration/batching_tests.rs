//! Batch boundary and ordering tests
//!
//! Every run is checked against the exact sequence of pause, batch and
//! resume events it should produce.

#[cfg(test)]
mod tests {
    use crate::common::{EventLog, FlowEvent, LoggingHandler, ScriptedSource};
    use stream_batcher::{BatchCollector, BatchOptions, parser_fn, stream_batch};

    fn expected_events(len: usize, batch_size: usize) -> Vec<FlowEvent> {
        let items: Vec<String> = (0..len).map(|i| i.to_string()).collect();
        let mut events = Vec::new();
        for (index, chunk) in items.chunks(batch_size).enumerate() {
            let total = (index * batch_size + chunk.len()) as u64;
            let batch = FlowEvent::Batch {
                items: chunk.to_vec(),
                total,
            };
            if chunk.len() == batch_size {
                events.extend([FlowEvent::Pause, batch, FlowEvent::Resume]);
            } else {
                events.push(batch);
            }
        }
        events
    }

    // ==================== Boundary Grid ====================

    #[tokio::test]
    async fn test_every_length_and_batch_size() {
        for batch_size in 1..=5usize {
            for len in 0..=12usize {
                let log = EventLog::new();
                let mut source = ScriptedSource::items((0..len).collect(), log.clone());
                let mut handler = LoggingHandler::new(log.clone());
                let options = BatchOptions::new().with_batch_size(batch_size);

                let total = stream_batch(&mut source, &mut handler, options)
                    .await
                    .unwrap();

                assert_eq!(total, len as u64, "len={} batch_size={}", len, batch_size);
                assert_eq!(
                    log.events(),
                    expected_events(len, batch_size),
                    "len={} batch_size={}",
                    len,
                    batch_size
                );

                let full = len / batch_size;
                assert_eq!(log.count(&FlowEvent::Pause), full);
                assert_eq!(log.count(&FlowEvent::Resume), full);
                let remainder_batches = usize::from(len % batch_size != 0);
                assert_eq!(log.batches().len(), full + remainder_batches);
            }
        }
    }

    #[tokio::test]
    async fn test_concatenated_batches_reproduce_input() {
        let log = EventLog::new();
        let input: Vec<u32> = (0..97).collect();
        let mut source = ScriptedSource::items(input.clone(), log.clone());
        let mut handler = LoggingHandler::new(log.clone());

        stream_batch(&mut source, &mut handler, BatchOptions::new().with_batch_size(10))
            .await
            .unwrap();

        let flattened: Vec<String> = log.batches().into_iter().flat_map(|(b, _)| b).collect();
        let expected: Vec<String> = input.iter().map(u32::to_string).collect();
        assert_eq!(flattened, expected);

        let totals: Vec<u64> = log.batches().iter().map(|(_, t)| *t).collect();
        assert!(totals.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(totals.last(), Some(&97));
    }

    // ==================== Worked Examples ====================

    #[tokio::test]
    async fn test_letters_in_threes() {
        let log = EventLog::new();
        let mut source = ScriptedSource::items(vec!["a", "b", "c", "d", "e"], log.clone());
        let mut handler = LoggingHandler::new(log.clone());

        let total = stream_batch(&mut source, &mut handler, BatchOptions::new().with_batch_size(3))
            .await
            .unwrap();

        assert_eq!(total, 5);
        assert_eq!(
            log.batches(),
            vec![
                (vec!["a".to_string(), "b".to_string(), "c".to_string()], 3),
                (vec!["d".to_string(), "e".to_string()], 5),
            ]
        );
    }

    #[tokio::test]
    async fn test_numbers_times_ten_in_pairs() {
        let log = EventLog::new();
        let mut source = ScriptedSource::items(vec![1, 2, 3, 4], log.clone());
        let mut handler = LoggingHandler::new(log.clone());

        let collector = BatchCollector::new(BatchOptions::new().with_batch_size(2))
            .unwrap()
            .with_parser(parser_fn(|x: i32| x * 10));
        let total = collector.run(&mut source, &mut handler).await.unwrap();

        assert_eq!(total, 4);
        assert_eq!(
            log.events(),
            vec![
                FlowEvent::Pause,
                FlowEvent::Batch {
                    items: vec!["10".into(), "20".into()],
                    total: 2
                },
                FlowEvent::Resume,
                FlowEvent::Pause,
                FlowEvent::Batch {
                    items: vec!["30".into(), "40".into()],
                    total: 4
                },
                FlowEvent::Resume,
            ]
        );
    }
}
