use crate::{Error, Point2};

/// Relative slack applied before rounding grid sizes up, so that sizes that
/// are exact multiples of the pixel pitch do not gain a cell from float noise.
const GRID_EPS: f64 = 1e-9;

/// Drawing area and raster pitch shared by every pixel-space stage.
///
/// Pixel `(x, y)` covers `[x·pixel_mm, (x+1)·pixel_mm) × [y·pixel_mm, (y+1)·pixel_mm)`
/// with row 0 at the bottom of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sheet {
    pub width_mm: f64,
    pub height_mm: f64,
    pub pixel_mm: f64,
}

impl Sheet {
    pub fn new(width_mm: f64, height_mm: f64, pixel_mm: f64) -> Result<Self, Error> {
        let sheet = Self {
            width_mm,
            height_mm,
            pixel_mm,
        };
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let ok = [self.width_mm, self.height_mm, self.pixel_mm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if ok { Ok(()) } else { Err(Error::DegenerateInput) }
    }

    /// Grid dimensions `(width_px, height_px)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (
            cells_for(self.width_mm, self.pixel_mm),
            cells_for(self.height_mm, self.pixel_mm),
        )
    }

    /// Millimeter position of a pixel center, clamped to the sheet.
    pub fn cell_center(&self, x: usize, y: usize) -> Point2 {
        let px = (x as f64 + 0.5) * self.pixel_mm;
        let py = (y as f64 + 0.5) * self.pixel_mm;
        Point2 {
            x: px.clamp(0.0, self.width_mm),
            y: py.clamp(0.0, self.height_mm),
        }
    }
}

fn cells_for(size_mm: f64, pixel_mm: f64) -> usize {
    let cells = (size_mm / pixel_mm * (1.0 - GRID_EPS)).ceil();
    if cells.is_finite() && cells >= 1.0 {
        cells as usize
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::Sheet;
    use crate::{Error, Point2};

    #[test]
    fn grid_size_rounds_up() {
        let sheet = Sheet::new(6.0, 10.0, 0.1).expect("valid sheet");
        assert_eq!(sheet.grid_size(), (60, 100));

        let sheet = Sheet::new(6.05, 0.01, 0.1).expect("valid sheet");
        assert_eq!(sheet.grid_size(), (61, 1));
    }

    #[test]
    fn cell_center_is_clamped() {
        let sheet = Sheet::new(1.0, 1.0, 0.3).expect("valid sheet");
        assert_eq!(sheet.grid_size(), (4, 4));

        let p = sheet.cell_center(0, 1);
        assert!((p.x - 0.15).abs() < 1e-12);
        assert!((p.y - 0.45).abs() < 1e-12);
        assert_eq!(sheet.cell_center(3, 3), Point2::new(1.0, 1.0));
    }

    #[test]
    fn rejects_degenerate_sheets() {
        assert_eq!(Sheet::new(0.0, 1.0, 0.1), Err(Error::DegenerateInput));
        assert_eq!(Sheet::new(1.0, 1.0, f64::NAN), Err(Error::DegenerateInput));
        assert_eq!(Sheet::new(1.0, -2.0, 0.1), Err(Error::DegenerateInput));
    }
}
