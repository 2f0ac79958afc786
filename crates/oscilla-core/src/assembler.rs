//! Accumulates render-callback bursts into full analysis blocks.
//!
//! The audio device delivers short bursts (the original engine renders
//! 128 frames per callback) while every analyzer consumes whole
//! `BLOCK_SIZE` blocks. The assembler copies bursts into a local block
//! and publishes it to the audio tap exchange each time it fills. Runs
//! entirely on the render thread; the publish is a wait-free exchange
//! write and a failed claim simply drops that block.

use std::sync::Arc;

use crate::config::BLOCK_SIZE;
use crate::frame::AudioBlock;
use crate::snapshot::SnapshotExchange;

/// Render-thread block accumulator feeding the audio tap.
pub struct BlockAssembler {
    block: AudioBlock,
    fill: usize,
    tap: Arc<SnapshotExchange<AudioBlock>>,
}

impl BlockAssembler {
    pub fn new(tap: Arc<SnapshotExchange<AudioBlock>>) -> Self {
        Self {
            block: AudioBlock::silence(),
            fill: 0,
            tap,
        }
    }

    /// Append one callback's worth of mono samples, publishing each block
    /// that completes. Accepts any burst length, including bursts larger
    /// than a block.
    pub fn push_samples(&mut self, mut samples: &[f32]) {
        while !samples.is_empty() {
            let take = samples.len().min(BLOCK_SIZE - self.fill);
            self.block.samples[self.fill..self.fill + take].copy_from_slice(&samples[..take]);
            self.fill += take;
            samples = &samples[take..];

            if self.fill == BLOCK_SIZE {
                let block = self.block;
                self.tap.write(|payload| *payload = block);
                self.fill = 0;
            }
        }
    }

    /// Samples accumulated toward the next block.
    pub fn pending(&self) -> usize {
        self.fill
    }

    /// Discard any partial block.
    pub fn reset(&mut self) {
        self.fill = 0;
    }

    /// The exchange the assembler publishes completed blocks to.
    pub fn tap(&self) -> &Arc<SnapshotExchange<AudioBlock>> {
        &self.tap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::WritePolicy;

    fn assembler() -> BlockAssembler {
        BlockAssembler::new(Arc::new(SnapshotExchange::new(WritePolicy::OverwriteLatest)))
    }

    #[test]
    fn test_no_publish_until_full() {
        let mut asm = assembler();
        asm.push_samples(&[0.5; BLOCK_SIZE - 1]);
        assert_eq!(asm.pending(), BLOCK_SIZE - 1);
        assert!(asm.tap().begin_read().is_none());
    }

    #[test]
    fn test_publishes_on_exact_fill() {
        let mut asm = assembler();
        // Eight 128-sample bursts, as the original callback delivers.
        for _ in 0..8 {
            asm.push_samples(&[0.25; 128]);
        }
        assert_eq!(asm.pending(), 0);

        let block = asm.tap().read_latest().expect("block published");
        assert!(block.samples.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_burst_larger_than_block() {
        let mut asm = assembler();
        let burst = vec![1.0; BLOCK_SIZE + 100];
        asm.push_samples(&burst);
        assert_eq!(asm.pending(), 100);
        assert!(asm.tap().read_latest().is_some());
    }

    #[test]
    fn test_reset_discards_partial_block() {
        let mut asm = assembler();
        asm.push_samples(&[0.5; 100]);
        asm.reset();
        assert_eq!(asm.pending(), 0);
        assert!(asm.tap().begin_read().is_none());
    }
}
