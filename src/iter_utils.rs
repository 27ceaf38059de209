//! Min/max selection over `PartialOrd` keys such as `f32` distances.
//!
//! The running optimum is only replaced on a strict improvement, so on ties
//! the earliest element wins.

fn optimum_select<I, B, F, Better>(mut it: I, mut key: F, mut better: Better)
        -> Option<(I::Item, B)>
        where
            I: Iterator,
            F: FnMut(&I::Item) -> B,
            Better: FnMut(&B, &B) -> bool {
    it.next().map(|mut best| {
        let mut best_key = key(&best);
        for x in it {
            let x_key = key(&x);
            if better(&x_key, &best_key) {
                best_key = x_key;
                best = x;
            }
        }
        (best, best_key)
    })
}

pub fn min_partial<I>(it: I) -> Option<I::Item>
        where I: Iterator, I::Item: PartialOrd + Copy {
    optimum_select(it, |x| *x, |x, m| x < m).map(|m| m.0)
}

pub fn min_by_key_partial<I, B, F>(it: I, key: F) -> Option<I::Item>
        where I: Iterator, B: PartialOrd, F: FnMut(&I::Item) -> B {
    optimum_select(it, key, |x, m| x < m).map(|m| m.0)
}

pub fn max_by_key_partial<I, B, F>(it: I, key: F) -> Option<I::Item>
        where I: Iterator, B: PartialOrd, F: FnMut(&I::Item) -> B {
    optimum_select(it, key, |x, m| x > m).map(|m| m.0)
}
