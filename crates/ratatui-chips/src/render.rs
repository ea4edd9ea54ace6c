use crate::chip::Chip;
use crate::chip::ChipCell;
use crate::chip::ChipCellKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::rc::Rc;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Writes `input` at `(x, y)`, stopping before it would exceed `max_cols` display columns.
///
/// Wide characters that do not fit are dropped rather than split. Returns the columns written.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
        if w == 0 {
            continue;
        }
        if dx + w > max_cols {
            break;
        }

        let s = ch.encode_utf8(&mut tmp);
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        if w == 2 {
            if let Some(cell) = buf.cell_mut((x + dx + 1, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        dx += w;
    }
    dx
}

pub fn str_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Places items of the given widths left to right, wrapping to a new line when the next item
/// does not fit. Items wider than the area are clipped to its width. Items that fall below the
/// area are omitted, so the result can be shorter than `widths`.
///
/// With `rtl`, each line is laid out from the right edge instead.
pub fn flow_layout(area: Rect, widths: &[u16], gap: u16, rtl: bool) -> Vec<Rect> {
    let mut out = Vec::with_capacity(widths.len());
    if area.width == 0 || area.height == 0 {
        return out;
    }

    let mut col = 0u16;
    let mut row = 0u16;
    for &w in widths {
        let w = w.min(area.width);
        if col > 0 && col.saturating_add(w) > area.width {
            col = 0;
            row += 1;
        }
        if row >= area.height {
            break;
        }

        let x = if rtl {
            area.x + area.width - col - w
        } else {
            area.x + col
        };
        out.push(Rect::new(x, area.y + row, w, 1));
        col = col.saturating_add(w).saturating_add(gap);
    }
    out
}

#[derive(Clone, Copy, Debug)]
pub struct ChipStyles {
    pub base: Style,
    pub focused: Style,
    pub disabled: Style,
    pub selected: Style,
    /// The remove button, patched over the chip's base style.
    pub remove: Style,
}

/// Screen area of one focusable chip cell, recorded at render time for mouse hit-testing.
#[derive(Clone, Debug)]
pub struct HitArea {
    pub rect: Rect,
    pub cell: Rc<ChipCell>,
}

pub fn hit_test(areas: &[HitArea], x: u16, y: u16) -> Option<&Rc<ChipCell>> {
    areas
        .iter()
        .find(|a| {
            x >= a.rect.x
                && x < a.rect.x.saturating_add(a.rect.width)
                && y >= a.rect.y
                && y < a.rect.y.saturating_add(a.rect.height)
        })
        .map(|a| &a.cell)
}

/// Draws `chip` into `rect` (one line) and appends its cells' screen areas to `hits`.
pub fn render_chip(
    chip: &Chip,
    rect: Rect,
    buf: &mut Buffer,
    styles: &ChipStyles,
    hits: &mut Vec<HitArea>,
) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }

    let base = if chip.is_disabled() {
        styles.disabled
    } else if chip.is_selected() {
        styles.selected
    } else {
        styles.base
    };
    let cell_style = |kind: ChipCellKind, style: Style| {
        if chip.cell(kind).is_some_and(|c| c.is_focused()) {
            style.patch(styles.focused)
        } else {
            style
        }
    };

    let y = rect.y;
    let end = rect.x + rect.width;
    let mut x = rect.x;

    put(buf, &mut x, y, end, "[", base);
    let mut label = String::new();
    if chip.is_selected() {
        label.push_str(crate::chip::SELECTED_ICON);
        label.push(' ');
    }
    label.push_str(chip.label());
    put(
        buf,
        &mut x,
        y,
        end,
        &label,
        cell_style(ChipCellKind::Primary, base),
    );
    if let Some(cell) = chip.cell(ChipCellKind::Primary) {
        hits.push(HitArea {
            rect: Rect::new(rect.x, y, x - rect.x, 1),
            cell: cell.clone(),
        });
    }

    if let Some(cell) = chip.cell(ChipCellKind::Remove) {
        put(buf, &mut x, y, end, " ", base);
        let icon = put(
            buf,
            &mut x,
            y,
            end,
            crate::chip::REMOVE_ICON,
            cell_style(ChipCellKind::Remove, base.patch(styles.remove)),
        );
        if icon.width > 0 {
            hits.push(HitArea {
                rect: icon,
                cell: cell.clone(),
            });
        }
    }
    put(buf, &mut x, y, end, "]", base);
}

fn put(buf: &mut Buffer, x: &mut u16, y: u16, end: u16, s: &str, style: Style) -> Rect {
    let start = *x;
    let n = render_str_clipped(start, y, end.saturating_sub(start), buf, s, style);
    *x += n;
    Rect::new(start, y, n, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_render_stops_before_wide_char_overflow() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        let n = render_str_clipped(0, 0, 4, &mut buf, "ab界c", Style::default());
        assert_eq!(n, 4);
        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(2, 0)].symbol(), "界");

        let n = render_str_clipped(0, 0, 3, &mut buf, "ab界", Style::default());
        assert_eq!(n, 2);
    }

    #[test]
    fn flow_wraps_and_mirrors() {
        let area = Rect::new(0, 0, 10, 3);
        let rects = flow_layout(area, &[4, 4, 4], 1, false);
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 4, 1),
                Rect::new(5, 0, 4, 1),
                Rect::new(0, 1, 4, 1)
            ]
        );

        let rects = flow_layout(area, &[4, 4], 1, true);
        assert_eq!(rects, vec![Rect::new(6, 0, 4, 1), Rect::new(1, 0, 4, 1)]);
    }

    #[test]
    fn flow_drops_items_below_area() {
        let rects = flow_layout(Rect::new(0, 0, 4, 1), &[4, 4], 0, false);
        assert_eq!(rects.len(), 1);
    }
}
