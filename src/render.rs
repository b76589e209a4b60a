//! Half-block terminal renderer.
//!
//! Each terminal cell shows two vertical pixels (`▀` with separate foreground
//! and background colours). The renderer only reads a [`RenderState`]; all
//! positions arrive as play-field percentages and are scaled here.

use crate::session::{Overlay, Phase, RenderState};
use crate::obstacle::Half;
use crossterm::{cursor, queue, style::{self, Color}};
use std::io::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn color(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

/// Colours that change with boss mode.
struct Palette {
    sky_top: Rgb,
    sky_bot: Rgb,
    hill_far: Rgb,
    hill_near: Rgb,
    pipe_dark: Rgb,
    pipe_mid: Rgb,
    pipe_hi: Rgb,
    pipe_light: Rgb,
    cap_edge: Rgb,
}

const NORMAL: Palette = Palette {
    sky_top: Rgb(70, 180, 200),
    sky_bot: Rgb(190, 232, 245),
    hill_far: Rgb(120, 195, 75),
    hill_near: Rgb(95, 175, 55),
    pipe_dark: Rgb(74, 122, 26),
    pipe_mid: Rgb(100, 170, 40),
    pipe_hi: Rgb(145, 215, 62),
    pipe_light: Rgb(115, 191, 46),
    cap_edge: Rgb(60, 100, 20),
};

const BOSS: Palette = Palette {
    sky_top: Rgb(25, 10, 35),
    sky_bot: Rgb(90, 30, 50),
    hill_far: Rgb(60, 25, 40),
    hill_near: Rgb(45, 15, 30),
    pipe_dark: Rgb(110, 20, 20),
    pipe_mid: Rgb(170, 35, 30),
    pipe_hi: Rgb(230, 90, 60),
    pipe_light: Rgb(195, 50, 40),
    cap_edge: Rgb(80, 10, 10),
};

const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Horizontal centre of the character, in percent of field width.
const CHARACTER_X: f64 = 20.0;

pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![NORMAL.sky_top; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, NORMAL.sky_top);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn dim_all(&mut self) {
        for p in &mut self.px {
            *p = p.dim();
        }
    }

    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.color()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.color()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1],
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1],
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1],
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1],
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1],
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1],
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0],
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1],
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1],
];

/// Draw `n` centred on `cx` with a drop shadow.
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let digits = n.to_string();
    let total_w = digits.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in digits.bytes().enumerate() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        let gx = start_x + i as i32 * 4;
        for (cell, on) in glyph.iter().enumerate() {
            if *on == 0 {
                continue;
            }
            let px = gx + (cell % 3) as i32;
            let py = y + (cell / 3) as i32;
            buf.set(px + 1, py + 1, SHADOW);
            buf.set(px, py, fg);
        }
    }
}

fn pipe_shade(p: &Palette, x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return p.pipe_mid;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(p.pipe_dark, p.pipe_mid, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(p.pipe_mid, p.pipe_hi, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(p.pipe_hi, p.pipe_light, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(p.pipe_light, p.pipe_dark, ((t - 160) * 3).min(256))
    }
}

/// Pixel geometry of the play field for the current terminal size.
#[derive(Debug, Clone, Copy)]
struct Field {
    w: usize,
    h: usize,
    ground_h: usize,
    scale: f64,
}

impl Field {
    fn new(pw: usize, ph: usize) -> Self {
        let scale = ph as f64 / 48.0;
        let ground_h = ((6.0 * scale).max(4.0) as usize).min(ph / 3);
        Self {
            w: pw,
            h: ph - ground_h,
            ground_h,
            scale,
        }
    }

    fn x(&self, pct: f64) -> i32 {
        (pct / 100.0 * self.w as f64).round() as i32
    }

    fn y(&self, pct: f64) -> i32 {
        (pct / 100.0 * self.h as f64).round() as i32
    }
}

pub struct Renderer {
    buf: PixelBuf,
    field: Field,
    scroll: f64,
    frame: u64,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        Self {
            buf: PixelBuf::new(pw, ph),
            field: Field::new(pw, ph),
            scroll: 0.0,
            frame: 0,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph);
        self.field = Field::new(pw, ph);
    }

    pub fn draw(&mut self, state: &RenderState, out: &mut impl Write) -> io::Result<()> {
        self.frame += 1;
        if matches!(state.phase, Phase::Running | Phase::Idle) {
            self.scroll += 0.5 * self.field.scale.max(1.0);
        }
        self.compose(state);
        self.buf.flush(out)
    }

    fn compose(&mut self, state: &RenderState) {
        let palette = if state.boss_mode { &BOSS } else { &NORMAL };
        self.draw_sky(palette);
        self.draw_hills(palette);
        for (top, bottom) in &state.obstacles {
            self.draw_pipe(palette, top, true);
            self.draw_pipe(palette, bottom, false);
        }
        self.draw_ground();
        self.draw_character(state);

        let cx = self.field.w as i32 / 2;
        match &state.overlay {
            Some(Overlay::Title) => self.draw_title(state.high_score),
            Some(Overlay::GameOver { score, high_score }) => {
                self.draw_game_over(*score, *high_score)
            }
            None => {
                draw_number(&mut self.buf, cx, 4, state.score, WHITE);
                if state.phase == Phase::Paused {
                    self.draw_paused();
                }
            }
        }
    }

    fn draw_sky(&mut self, p: &Palette) {
        let f = self.field;
        for y in 0..f.h {
            let t = (y * 256 / f.h.max(1)) as u16;
            let c = Rgb::lerp(p.sky_top, p.sky_bot, t);
            for x in 0..f.w {
                self.buf.set(x as i32, y as i32, c);
            }
        }
    }

    fn draw_hills(&mut self, p: &Palette) {
        let f = self.field;
        let base = f.h as i32;
        let layers = [
            (0.2, 0.04, 6.0, 3.0, 4.0, p.hill_far),
            (0.4, 0.06, 4.0, 2.0, 2.0, p.hill_near),
        ];
        for (parallax, freq, amp, amp2, lift, color) in layers {
            for x in 0..f.w as i32 {
                let fx = (x as f64 + self.scroll * parallax) * freq;
                let h = (fx.sin() * amp + (fx * 1.7).sin() * amp2) * f.scale;
                let top = base - h as i32 - (lift * f.scale) as i32;
                for y in top..base {
                    self.buf.set(x, y, color);
                }
            }
        }
    }

    fn draw_ground(&mut self) {
        let f = self.field;
        let gy = f.h as i32;
        for x in 0..f.w as i32 {
            let alt = ((x as f64 + self.scroll) as i32 / 3) % 2 == 0;
            self.buf.set(x, gy, if alt { GRASS } else { GRASS_LIGHT });
            self.buf.set(x, gy + 1, GRASS);
        }
        for y in (gy + 2)..(gy + f.ground_h as i32) {
            for x in 0..f.w as i32 {
                let stripe = ((x as f64 + self.scroll * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
                self.buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    /// One obstacle half. The cap sits on the edge that faces the gap.
    fn draw_pipe(&mut self, p: &Palette, half: &Half, from_top: bool) {
        let f = self.field;
        let x0 = f.x(half.left);
        let w = (f.x(half.left + half.width) - x0).max(1);
        let y0 = f.y(half.top);
        let y1 = f.y(half.top + half.height);
        if y1 <= y0 {
            return;
        }

        for dx in 0..w {
            let c = pipe_shade(p, dx, w);
            for y in y0..y1 {
                self.buf.set(x0 + dx, y, c);
            }
        }

        let extra = (f.scale).max(1.0) as i32;
        let cap_h = ((2.0 * f.scale).max(2.0) as i32).min(y1 - y0);
        let (cy0, cy1) = if from_top { (y1 - cap_h, y1) } else { (y0, y0 + cap_h) };
        for dx in -extra..(w + extra) {
            let c = pipe_shade(p, dx + extra, w + extra * 2);
            for y in cy0..cy1 {
                self.buf.set(x0 + dx, y, c);
            }
            self.buf.set(x0 + dx, cy0, p.cap_edge);
            self.buf.set(x0 + dx, cy1 - 1, p.cap_edge);
        }
    }

    fn draw_character(&mut self, state: &RenderState) {
        let f = self.field;
        let s = f.scale;
        let cx = f.x(CHARACTER_X);
        let bh = (2.0 * s).max(2.0) as i32;
        let bw = (3.0 * s).max(2.0) as i32;
        // position is the top edge of the sprite
        let top = f.y(state.character_top);
        let cy = top + bh;
        let lean = (state.tilt / 30.0).round().clamp(-1.0, 1.0) as i32;

        self.buf.fill_rect(cx - bw, top, bw * 2 + 1, bh * 2, BIRD_BODY);
        self.buf.fill_rect(cx - bw + 1, top, bw * 2 - 1, 1, BIRD_HI);

        let flap = if state.phase == Phase::Running && self.frame % 8 < 4 { -1 } else { 1 };
        let wing_w = (2.0 * s).max(1.0) as i32;
        let wing_h = (1.5 * s).max(1.0) as i32;
        self.buf.fill_rect(cx - bw + 1, cy + flap + lean, wing_w, wing_h, BIRD_WING);

        let ex = cx + bw - (1.5 * s) as i32;
        let ey = top + (1.0 * s).max(1.0) as i32;
        let eye = (0.8 * s).max(1.0) as i32;
        self.buf.fill_rect(ex, ey, eye + 1, eye + 1, BIRD_EYE);
        self.buf.set(ex + eye, ey + eye, BIRD_PUPIL);

        let beak_w = (2.5 * s).max(2.0) as i32;
        let beak_h = (1.5 * s).max(1.0) as i32;
        self.buf.fill_rect(cx + bw, cy - beak_h / 2 + lean, beak_w, beak_h, BIRD_BEAK);

        let tail_w = (1.5 * s).max(1.0) as i32;
        self.buf.fill_rect(cx - bw - tail_w, cy - 1 - lean, tail_w, 2, BIRD_WING);
    }

    fn draw_title(&mut self, best: u32) {
        let f = self.field;
        let cx = f.w as i32 / 2;
        let cy = f.h as i32 / 4;
        let letters = 6;
        let char_w = (4.0 * f.scale).max(3.0) as i32;
        let char_h = (6.0 * f.scale).max(4.0) as i32;
        let sx = cx - letters * char_w / 2;
        for i in 0..letters {
            let bx = sx + i * char_w;
            self.buf.fill_rect(bx, cy, char_w - 1, char_h, BIRD_BODY);
            self.buf.fill_rect(bx, cy, char_w - 1, 1, BIRD_HI);
        }

        let sub_y = cy + char_h + 4;
        self.draw_hint(cx, sub_y);
        if best > 0 {
            draw_number(&mut self.buf, cx, sub_y + 6, best, BIRD_BODY);
        }
    }

    /// "SPACE TO FLAP" as one small block per letter.
    fn draw_hint(&mut self, cx: i32, y: i32) {
        let msg = "SPACE TO FLAP";
        let x0 = cx - msg.len() as i32 * 4 / 2;
        for (i, ch) in msg.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            self.buf.fill_rect(x0 + i as i32 * 4, y, 3, 3, WHITE);
        }
    }

    fn draw_game_over(&mut self, score: u32, best: u32) {
        let f = self.field;
        let cx = f.w as i32 / 2;
        let cy = f.h as i32 / 2;
        let panel_w = (40.0 * f.scale).max(30.0) as i32;
        let panel_h = (20.0 * f.scale).max(16.0) as i32;

        self.buf.dim_all();

        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        self.buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        self.buf.fill_rect(px, py, panel_w, panel_h, DIRT);
        self.buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        draw_number(&mut self.buf, cx, py + 4, score, WHITE);
        draw_number(&mut self.buf, cx, py + 12, best, BIRD_BODY);
    }

    fn draw_paused(&mut self) {
        let f = self.field;
        self.buf.dim_all();
        let cx = f.w as i32 / 2;
        let cy = f.h as i32 / 2;
        let bar_w = (2.0 * f.scale).max(2.0) as i32;
        let bar_h = (8.0 * f.scale).max(6.0) as i32;
        self.buf.fill_rect(cx - bar_w * 2, cy - bar_h / 2, bar_w, bar_h, WHITE);
        self.buf.fill_rect(cx + bar_w, cy - bar_h / 2, bar_w, bar_h, WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RenderState {
        RenderState {
            phase: Phase::Running,
            character_top: 50.0,
            tilt: 0.0,
            obstacles: Vec::new(),
            score: 0,
            high_score: 0,
            boss_mode: false,
            overlay: None,
        }
    }

    #[test]
    fn percent_maps_onto_sky_area() {
        let f = Field::new(100, 48);
        assert_eq!(f.x(0.0), 0);
        assert_eq!(f.x(100.0), 100);
        assert_eq!(f.y(100.0), f.h as i32);
        assert_eq!(f.h + f.ground_h, 48);
    }

    #[test]
    fn boss_mode_changes_sky_colour() {
        let mut r = Renderer::new(80, 24);
        r.compose(&state());
        let normal = r.buf.get(0, 0);
        r.compose(&RenderState {
            boss_mode: true,
            ..state()
        });
        assert_ne!(r.buf.get(0, 0), normal);
        assert_eq!(r.buf.get(0, 0), BOSS.sky_top);
    }

    #[test]
    fn obstacle_halves_are_painted() {
        let mut r = Renderer::new(80, 24);
        let top = Half {
            left: 50.0,
            top: 0.0,
            width: 10.0,
            height: 30.0,
        };
        let bottom = Half {
            left: 50.0,
            top: 55.0,
            width: 10.0,
            height: 45.0,
        };
        let sky = {
            r.compose(&state());
            r.buf.get(42, 1)
        };
        r.compose(&RenderState {
            obstacles: vec![(top, bottom)],
            ..state()
        });
        assert_ne!(r.buf.get(42, 1), sky);
    }

    #[test]
    fn title_shows_start_hint_row() {
        let mut r = Renderer::new(80, 24);
        r.compose(&RenderState {
            phase: Phase::Idle,
            overlay: Some(Overlay::Title),
            ..state()
        });
        let f = r.field;
        let char_h = (6.0 * f.scale).max(4.0) as i32;
        let hint_y = (f.h as i32 / 4 + char_h + 4) as usize;
        let x0 = 40 - 13 * 4 / 2;
        // 'S' block and the gap where the first space sits
        assert_eq!(r.buf.get(x0 as usize, hint_y), WHITE);
        assert_ne!(r.buf.get((x0 + 5 * 4) as usize, hint_y), WHITE);
    }

    #[test]
    fn flush_emits_half_blocks() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.flush(&mut out).expect("write to vec");
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('\u{2580}'));
    }
}
