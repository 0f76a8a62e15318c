//! Binary code rain behind the hero
//!
//! Columns are laid out once from the container width. After that, a 100ms
//! flicker tick rewrites a random subset of cells. Falling motion itself is
//! a CSS animation; only the per-column delay and duration come from here.

use rand::Rng;

use super::patch::{Patch, Patches, Target};
use super::scheduler::{Scheduler, TimerId};
use super::settings::MatrixSettings;

pub const HIGHLIGHT_CLASS: &str = "highlight";

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub index: usize,
    pub left_px: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    /// Character and highlight flag per cell, top to bottom
    pub cells: Vec<(char, bool)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixTask {
    Flicker,
    /// Rebuild after a resize, using the width captured at resize time
    Rebuild,
}

#[derive(Debug)]
pub struct MatrixRain {
    charset: Vec<char>,
    columns: Vec<Vec<(char, bool)>>,
    flicker: Option<TimerId>,
    rebuild: Option<TimerId>,
    pending_width: f64,
    settings: MatrixSettings,
}

impl MatrixRain {
    pub fn new(settings: &MatrixSettings) -> Self {
        let mut charset: Vec<char> = settings.charset.chars().collect();
        if charset.is_empty() {
            charset = vec!['0', '1'];
        }
        Self {
            charset,
            columns: Vec::new(),
            flicker: None,
            rebuild: None,
            pending_width: 0.0,
            settings: settings.clone(),
        }
    }

    pub fn column_count_for(&self, container_width: f64) -> usize {
        if container_width <= 0.0 || self.settings.column_width <= 0.0 {
            return 0;
        }
        (container_width / self.settings.column_width).floor() as usize
    }

    pub fn columns(&self) -> &[Vec<(char, bool)>] {
        &self.columns
    }

    pub fn is_running(&self) -> bool {
        self.flicker.is_some()
    }

    fn random_char<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.charset[rng.gen_range(0..self.charset.len())]
    }

    /// Lay out columns for `container_width` and start flickering
    pub fn start<T, R>(
        &mut self,
        container_width: f64,
        rng: &mut R,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<MatrixTask> + Clone,
        R: Rng + ?Sized,
    {
        let count = self.column_count_for(container_width);
        let s = &self.settings;
        let (min_cells, max_cells) = (s.min_cells, s.max_cells.max(s.min_cells + 1));

        self.columns.clear();
        for index in 0..count {
            let delay_s = rng.gen_range(0.0..self.settings.max_delay_s.max(f64::EPSILON));
            let duration_s =
                rng.gen_range(self.settings.min_duration_s..=self.settings.max_duration_s);
            let cell_count = rng.gen_range(min_cells..max_cells);
            let cells: Vec<(char, bool)> = (0..cell_count)
                .map(|_| {
                    let ch = self.random_char(rng);
                    (ch, rng.gen_bool(self.settings.highlight_chance))
                })
                .collect();

            out.push(Patch::SpawnMatrixColumn(ColumnSpec {
                index,
                left_px: index as f64 * self.settings.column_width,
                delay_s,
                duration_s,
                cells: cells.clone(),
            }));
            self.columns.push(cells);
        }

        if self.flicker.is_none() {
            self.flicker =
                Some(scheduler.every(f64::from(self.settings.tick_ms), MatrixTask::Flicker.into()));
        }
    }

    pub fn handle<T, R>(
        &mut self,
        task: MatrixTask,
        rng: &mut R,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) where
        T: From<MatrixTask> + Clone,
        R: Rng + ?Sized,
    {
        match task {
            MatrixTask::Flicker => self.flicker(rng, out),
            MatrixTask::Rebuild => {
                self.rebuild = None;
                let width = self.pending_width;
                self.start(width, rng, scheduler, out);
            }
        }
    }

    fn flicker<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Patches) {
        let s = &self.settings;
        let (column_chance, cell_chance, highlight_chance) =
            (s.column_chance, s.cell_chance, s.highlight_chance);

        for column in 0..self.columns.len() {
            if !rng.gen_bool(column_chance) {
                continue;
            }
            for row in 0..self.columns[column].len() {
                if !rng.gen_bool(cell_chance) {
                    continue;
                }
                let ch = self.random_char(rng);
                let target = Target::MatrixCell { column, row };
                let cell = &mut self.columns[column][row];
                cell.0 = ch;
                out.push(Patch::text(target, ch.to_string()));

                if rng.gen_bool(highlight_chance) {
                    cell.1 = !cell.1;
                    out.push(Patch::class(target, HIGHLIGHT_CLASS, cell.1));
                }
            }
        }
    }

    /// Stop flickering; columns stay in place
    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(id) = self.flicker.take() {
            scheduler.cancel(id);
        }
    }

    /// Stop and empty the container
    pub fn destroy<T: Clone>(&mut self, scheduler: &mut Scheduler<T>, out: &mut Patches) {
        self.stop(scheduler);
        if let Some(id) = self.rebuild.take() {
            scheduler.cancel(id);
        }
        self.columns.clear();
        out.push(Patch::ClearMatrix);
    }

    /// Tear down now and rebuild for the new width after a short delay.
    /// Repeated resizes inside the delay collapse into one rebuild.
    pub fn resize<T: From<MatrixTask> + Clone>(
        &mut self,
        container_width: f64,
        scheduler: &mut Scheduler<T>,
        out: &mut Patches,
    ) {
        self.destroy(scheduler, out);
        self.pending_width = container_width;
        self.rebuild = Some(scheduler.after(
            f64::from(self.settings.rebuild_delay_ms),
            MatrixTask::Rebuild.into(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn columns_of(out: &Patches) -> Vec<&ColumnSpec> {
        out.iter()
            .filter_map(|patch| match patch {
                Patch::SpawnMatrixColumn(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }

    fn run(
        rain: &mut MatrixRain,
        rng: &mut SmallRng,
        scheduler: &mut Scheduler<MatrixTask>,
        until: f64,
        out: &mut Patches,
    ) {
        while let Some(due) = scheduler.pop_due(until) {
            rain.handle(due.task, rng, scheduler, out);
        }
    }

    #[test]
    fn test_column_layout() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(11);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();

        rain.start(410.0, &mut rng, &mut scheduler, &mut out);

        let columns = columns_of(&out);
        assert_eq!(columns.len(), 20);
        for (i, column) in columns.iter().enumerate() {
            assert_eq!(column.index, i);
            assert_eq!(column.left_px, i as f64 * 20.0);
            assert!((0.0..2.0).contains(&column.delay_s));
            assert!((3.0..=5.0).contains(&column.duration_s));
            assert!((20..30).contains(&column.cells.len()));
        }
        assert!(rain.is_running());
    }

    #[test]
    fn test_narrow_container_has_no_columns() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(11);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();

        rain.start(19.0, &mut rng, &mut scheduler, &mut out);
        assert!(columns_of(&out).is_empty());
    }

    #[test]
    fn test_flicker_writes_match_model() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();
        rain.start(800.0, &mut rng, &mut scheduler, &mut out);
        out.clear();

        run(&mut rain, &mut rng, &mut scheduler, 2_000.0, &mut out);

        // 20 ticks over 40 columns: something must have changed
        assert!(!out.is_empty());
        for patch in &out {
            match patch {
                Patch::Text {
                    target: Target::MatrixCell { column, row },
                    text,
                } => {
                    let mut chars = text.chars();
                    let ch = chars.next().unwrap();
                    assert!(chars.next().is_none());
                    assert!(MatrixSettings::default().charset.contains(ch));
                    assert!(*column < 40);
                    assert!(*row < rain.columns()[*column].len());
                }
                Patch::Class { class, .. } => assert_eq!(*class, HIGHLIGHT_CLASS),
                other => panic!("unexpected patch {other:?}"),
            }
        }
    }

    #[test]
    fn test_stop_halts_flicker() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();
        rain.start(800.0, &mut rng, &mut scheduler, &mut out);

        rain.stop(&mut scheduler);
        out.clear();
        run(&mut rain, &mut rng, &mut scheduler, 5_000.0, &mut out);
        assert!(out.is_empty());
        assert!(!rain.is_running());
    }

    #[test]
    fn test_resize_rebuilds_once_after_delay() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(9);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();
        rain.start(800.0, &mut rng, &mut scheduler, &mut out);
        out.clear();

        rain.resize(600.0, &mut scheduler, &mut out);
        rain.resize(400.0, &mut scheduler, &mut out);
        assert_eq!(out.last(), Some(&Patch::ClearMatrix));
        assert!(rain.columns().is_empty());

        out.clear();
        run(&mut rain, &mut rng, &mut scheduler, 100.0, &mut out);
        assert_eq!(columns_of(&out).len(), 20);
        assert!(rain.is_running());
    }

    #[test]
    fn test_destroy_clears_container() {
        let mut rain = MatrixRain::new(&MatrixSettings::default());
        let mut rng = SmallRng::seed_from_u64(2);
        let mut scheduler: Scheduler<MatrixTask> = Scheduler::new();
        let mut out = Vec::new();
        rain.start(200.0, &mut rng, &mut scheduler, &mut out);

        out.clear();
        rain.destroy(&mut scheduler, &mut out);
        assert_eq!(out, vec![Patch::ClearMatrix]);
        assert_eq!(scheduler.pending(), 0);
    }
}
