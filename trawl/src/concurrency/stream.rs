use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use pin_project_lite::pin_project;

pin_project! {
    /// A stream adapter that groups items into fixed-size batches.
    ///
    /// This stream collects items from the underlying stream into batches of at most
    /// `max_size`, emitting a partial final batch when the underlying stream ends.
    /// A batch is never emitted early: the adapter holds a partial batch while the
    /// inner stream is pending.
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct BatchStream<B, S: Stream<Item = B>> {
        #[pin]
        stream: S,
        items: Vec<S::Item>,
        max_size: usize,
        inner_stream_ended: bool,
    }
}

impl<B, S: Stream<Item = B>> BatchStream<B, S> {
    /// Creates a new [`BatchStream`] wrapping `stream`.
    ///
    /// `max_size` must be non-zero; configuration validation enforces this
    /// before a source is built.
    pub fn wrap(stream: S, max_size: usize) -> Self {
        debug_assert!(max_size > 0, "batch size must be non-zero");

        BatchStream {
            stream,
            items: Vec::with_capacity(max_size),
            max_size,
            inner_stream_ended: false,
        }
    }
}

impl<B, S: Stream<Item = B>> Stream for BatchStream<B, S> {
    type Item = Vec<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Fast path: if the inner stream has already ended, we're done.
        if *this.inner_stream_ended {
            return Poll::Ready(None);
        }

        loop {
            // Pre-allocate batch capacity when starting to collect items, to
            // avoid reallocations during batch collection.
            if this.items.is_empty() {
                this.items.reserve_exact(*this.max_size);
            }

            match this.stream.as_mut().poll_next(cx) {
                Poll::Pending => {
                    // No more items available right now; hold the partial batch
                    // until the inner stream progresses or ends.
                    return Poll::Pending;
                }
                Poll::Ready(Some(item)) => {
                    this.items.push(item);

                    // If the batch is full, emit immediately.
                    if this.items.len() >= *this.max_size {
                        return Poll::Ready(Some(std::mem::take(this.items)));
                    }
                    // Continue the loop to collect more items.
                }
                Poll::Ready(None) => {
                    // Underlying stream finished. Return the final partial batch
                    // if we have items, otherwise signal completion.
                    let last = if this.items.is_empty() {
                        None
                    } else {
                        Some(std::mem::take(this.items))
                    };

                    *this.inner_stream_ended = true;

                    return Poll::Ready(last);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::task::Poll;
    use futures::StreamExt;
    use futures::future::poll_fn;
    use pin_project_lite::pin_project;

    pin_project! {
        struct TwoThenPending {
            emitted: usize,
        }
    }

    impl TwoThenPending {
        fn new() -> Self {
            Self { emitted: 0 }
        }
    }

    impl Stream for TwoThenPending {
        type Item = i32;

        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            match self.emitted {
                0 => {
                    self.emitted = 1;
                    Poll::Ready(Some(1))
                }
                1 => {
                    self.emitted = 2;
                    Poll::Ready(Some(2))
                }
                _ => Poll::Pending,
            }
        }
    }

    #[tokio::test]
    async fn emits_full_batches_then_partial_final_batch() {
        let stream = BatchStream::wrap(futures::stream::iter(vec![1, 2, 3, 4, 5]), 2);
        let batches: Vec<Vec<i32>> = stream.collect().await;

        assert_eq!(batches, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[tokio::test]
    async fn empty_stream_yields_no_batches() {
        let mut stream = BatchStream::wrap(futures::stream::iter(Vec::<i32>::new()), 3);

        assert_eq!(stream.next().await, None);
        // The fast path keeps returning end-of-stream once the inner stream ended.
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn holds_partial_batch_while_inner_stream_is_pending() {
        let mut stream = Box::pin(BatchStream::wrap(TwoThenPending::new(), 3));

        // The inner stream yields 2 items and then suspends; with a batch size
        // of 3 the adapter must hold the partial batch and stay pending.
        poll_fn(|cx| match stream.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Ready(()),
            _ => panic!("expected pending"),
        })
        .await;
    }

    #[tokio::test]
    async fn batch_size_equal_to_stream_length_emits_one_batch() {
        let stream = BatchStream::wrap(futures::stream::iter(vec![1, 2, 3]), 3);
        let batches: Vec<Vec<i32>> = stream.collect().await;

        assert_eq!(batches, vec![vec![1, 2, 3]]);
    }
}
