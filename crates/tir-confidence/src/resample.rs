//! Cluster resampling of panels
//!
//! Whole subjects are drawn with replacement. Every draw becomes its own
//! subject: its identifier records the draw rank among draws of the same
//! source subject, so two copies of one subject never merge downstream.

use rand::Rng;
use tir_core::Panel;

/// Source-subject indices of one cluster resample of `n_subjects`
pub fn draw_subject_indices<R: Rng + ?Sized>(n_subjects: usize, rng: &mut R) -> Vec<usize> {
    (0..n_subjects).map(|_| rng.gen_range(0..n_subjects)).collect()
}

/// Draw `panel.n_subjects()` subjects with replacement
///
/// The k-th draw of a source subject is relabelled with draw rank `k`
/// (starting at 1); its observations are shared with the source.
pub fn cluster_resample<R: Rng + ?Sized>(panel: &Panel, rng: &mut R) -> Panel {
    let subjects = panel.subjects();
    let mut ranks = vec![0u32; subjects.len()];

    let drawn = draw_subject_indices(subjects.len(), rng)
        .into_iter()
        .map(|k| {
            ranks[k] += 1;
            let source = &subjects[k];
            source.relabelled(source.id().resampled(ranks[k]))
        })
        .collect();

    panel.with_subjects(drawn)
}
