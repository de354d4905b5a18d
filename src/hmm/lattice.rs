/// Viterbi work space for one sentence.
///
/// Scores are natural logs. A transition matrix passed to [`Lattice::viterbi`]
/// is `[L+1][L+1]` row-major: row `L` holds the transitions out of START and
/// column `L` the transitions into END.
#[derive(Debug, Default)]
pub(crate) struct Lattice {
    /// The number of distinct labels (L).
    num_labels: usize,
    /// The number of items (T) in the sentence.
    num_items: usize,
    /// The number of items the buffers can currently hold.
    cap_items: usize,
    /// `[T][L]`: log emission of the word at #t under label #l.
    pub state: Vec<f64>,
    /// `[T][L]`: best score of a path from START arriving at (t, l).
    score: Vec<f64>,
    /// `[T][L]`: the label at #t-1 on the best path arriving at (t, l).
    backward_edge: Vec<usize>,
}

impl Lattice {
    pub fn new(num_labels: usize, num_items: usize) -> Self {
        let mut this = Self { num_labels, ..Default::default() };
        this.set_num_items(num_items);
        this
    }

    pub fn set_num_items(&mut self, t: usize) {
        let l = self.num_labels;
        self.num_items = t;
        if self.cap_items < t {
            self.state.resize(t * l, 0.0);
            self.score.resize(t * l, 0.0);
            self.backward_edge.resize(t * l, 0);
            self.cap_items = t;
        }
        self.state[..t * l].fill(f64::NEG_INFINITY);
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Fills `labels` with the best path and returns its score, which is
    /// `-inf` when no path survives.
    pub fn viterbi(&mut self, trans: &[f64], labels: &mut [usize]) -> f64 {
        let t_len = self.num_items;
        let l = self.num_labels;
        let w = l + 1;
        debug_assert_eq!(trans.len(), w * w);
        debug_assert_eq!(labels.len(), t_len);
        if t_len == 0 || l == 0 {
            return f64::NEG_INFINITY;
        }

        /* Scores at (0, *) start from BOS. */
        for j in 0..l {
            self.score[j] = trans[w * l + j] + self.state[j];
        }
        for t in 1..t_len {
            for j in 0..l {
                let mut max_score = f64::NEG_INFINITY;
                let mut argmax = 0;
                for i in 0..l {
                    /* Transit from (t-1, i) to (t, j). */
                    let score = self.score[l * (t - 1) + i] + trans[w * i + j];
                    if max_score < score {
                        max_score = score;
                        argmax = i;
                    }
                }
                self.backward_edge[l * t + j] = argmax;
                self.score[l * t + j] = max_score + self.state[l * t + j];
            }
        }

        /* Find the node (T-1, i) that reaches EOS with the maximum score. */
        let mut max_score = f64::NEG_INFINITY;
        labels[t_len - 1] = 0;
        for i in 0..l {
            let score = self.score[l * (t_len - 1) + i] + trans[w * i + l];
            if max_score < score {
                max_score = score;
                labels[t_len - 1] = i;
            }
        }
        for t in (0..t_len - 1).rev() {
            labels[t] = self.backward_edge[l * (t + 1) + labels[t + 1]];
        }
        max_score
    }

    /// Score of a given label path, BOS and EOS transitions included.
    pub fn score(&self, trans: &[f64], labels: &[usize]) -> f64 {
        let l = self.num_labels;
        let w = l + 1;
        let mut prev = l;
        let mut r = 0.0;
        for (t, &j) in labels.iter().enumerate().take(self.num_items) {
            r += trans[w * prev + j] + self.state[l * t + j];
            prev = j;
        }
        r + trans[w * prev + l]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEG: f64 = f64::NEG_INFINITY;

    #[test]
    fn init() {
        let lattice = Lattice::new(3, 5);
        assert_eq!(lattice.num_items, 5);
        assert_eq!(lattice.cap_items, 5);
        assert_eq!(lattice.state.len(), 15);
        assert!(lattice.state.iter().all(|&s| s == NEG));
    }

    #[test]
    fn shrink_keeps_capacity() {
        let mut lattice = Lattice::new(2, 6);
        lattice.set_num_items(2);
        assert_eq!(lattice.num_items(), 2);
        assert_eq!(lattice.cap_items, 6);
    }

    #[test]
    fn prefers_transition_when_emissions_tie() {
        // labels: 0, 1; rows 0..2 then BOS; columns 0..2 then EOS
        let ln = f64::ln;
        let trans = vec![
            ln(0.1), ln(0.8), ln(0.1), //
            ln(0.7), ln(0.1), ln(0.2), //
            ln(0.9), ln(0.1), NEG, //
        ];
        let mut lattice = Lattice::new(2, 2);
        lattice.state.copy_from_slice(&[ln(0.5), ln(0.5), ln(0.5), ln(0.5)]);
        let mut labels = vec![9; 2];
        let best = lattice.viterbi(&trans, &mut labels);
        assert_eq!(labels, [0, 1]);
        let expected = ln(0.9) + ln(0.5) + ln(0.8) + ln(0.5) + ln(0.2);
        assert!((best - expected).abs() < 1e-12);
        assert!((lattice.score(&trans, &labels) - best).abs() < 1e-12);
    }

    #[test]
    fn no_surviving_path() {
        let trans = vec![NEG; 9];
        let mut lattice = Lattice::new(2, 1);
        lattice.state.copy_from_slice(&[0.0, 0.0]);
        let mut labels = vec![0; 1];
        assert_eq!(lattice.viterbi(&trans, &mut labels), NEG);
    }
}
