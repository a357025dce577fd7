//! Tests for the cricket frontend

use super::games::Games;
use super::ui::*;
use super::*;
use cricket::Screen;
use std::path::Path;

mod ui_builder {
    use super::*;
    #[test]
    fn default() {
        let ui_builder = UIBuilder::default();
        assert_eq!((64, 32), (ui_builder.width, ui_builder.height));
        assert_eq!(None, ui_builder.rom);
    }
    #[test]
    fn new() {
        let ui_builder = UIBuilder::new(32, 64, "dummy.ch8");
        assert_eq!(Some(Path::new("dummy.ch8")), ui_builder.rom.as_deref());
        assert_eq!(KeyMap::default(), ui_builder.keymap);
    }
    #[test]
    #[allow(clippy::redundant_clone)]
    fn clone_debug() {
        let ui_builder_clone = UIBuilder::default().clone();
        println!("{ui_builder_clone:?}");
    }
}

mod keymap {
    use super::*;
    use minifb::Key;
    #[test]
    fn default_layout() {
        let keymap = KeyMap::default();
        #[rustfmt::skip]
        let rows = [
            ([Key::Key1, Key::Key2, Key::Key3, Key::Key4], [0x1, 0x2, 0x3, 0xc]),
            ([Key::Q, Key::W, Key::E, Key::R], [0x4, 0x5, 0x6, 0xd]),
            ([Key::A, Key::S, Key::D, Key::F], [0x7, 0x8, 0x9, 0xe]),
            ([Key::Z, Key::X, Key::C, Key::V], [0xa, 0x0, 0xb, 0xf]),
        ];
        for (keys, hex) in rows {
            for (key, hex) in keys.into_iter().zip(hex) {
                assert_eq!(Some(hex), keymap.get(key), "{key:?}");
            }
        }
    }
    #[test]
    fn every_hex_key_is_bound_once() {
        let keymap = KeyMap::default();
        let mut seen = [0; 16];
        for &(_, hex) in &keymap.0 {
            seen[hex] += 1;
        }
        assert_eq!([1; 16], seen);
    }
    #[test]
    fn unbound() {
        let keymap = KeyMap::default();
        assert_eq!(None, keymap.get(Key::Escape));
        assert_eq!(None, keymap.get(Key::NumPadPlus));
    }
    #[test]
    fn custom() {
        let keymap = KeyMap(vec![(Key::Space, 0x5)]);
        assert_eq!(Some(0x5), keymap.get(Key::Space));
        assert_eq!(None, keymap.get(Key::W));
    }
}

mod repeater {
    use super::*;
    use minifb::Key;
    use std::time::{Duration, Instant};
    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }
    #[test]
    fn press_fires_at_once() {
        let mut repeater = Repeater::default();
        assert_eq!(vec![Key::W], repeater.poll(&[Key::W], Instant::now()));
    }
    #[test]
    fn held_key_repeats() {
        let mut repeater = Repeater::new(ms(500), ms(50));
        let start = Instant::now();
        let fired = |repeater: &mut Repeater, at| repeater.poll(&[Key::Q], start + ms(at)).len();
        assert_eq!(1, fired(&mut repeater, 0));
        assert_eq!(0, fired(&mut repeater, 100));
        assert_eq!(0, fired(&mut repeater, 499));
        assert_eq!(1, fired(&mut repeater, 500));
        assert_eq!(0, fired(&mut repeater, 530));
        assert_eq!(1, fired(&mut repeater, 550));
    }
    #[test]
    fn release_forgets() {
        let mut repeater = Repeater::default();
        let start = Instant::now();
        repeater.poll(&[Key::A, Key::S], start);
        assert!(repeater.poll(&[Key::S], start + ms(10)).is_empty());
        assert_eq!(vec![Key::A], repeater.poll(&[Key::A, Key::S], start + ms(20)));
    }
    #[test]
    fn repeat_rearms_debounced_key() {
        let keymap = KeyMap::default();
        let mut repeater = Repeater::default();
        let mut cpu = CPU::default();
        // 200: skp v0; 202: jmp 200; 204: jmp 200
        cpu.load_program_bytes(&[0xe0, 0x9e, 0x12, 0x00, 0x12, 0x00])
            .unwrap();
        cpu.set_v(0, 0x5).unwrap();
        let start = Instant::now();
        let mut skips = 0;
        for at in (0..1000).step_by(10) {
            for key in repeater.poll(&[Key::W], start + ms(at)) {
                cpu.press(keymap.get(key).unwrap()).unwrap();
            }
            cpu.step().unwrap();
            if cpu.pc() == 0x204 {
                skips += 1;
            }
            cpu.step().unwrap();
        }
        // one for the press, then one per repeat
        assert!(skips > 2, "{skips}");
    }
}

mod reload {
    use super::*;
    #[test]
    fn keeps_rate() {
        let path = std::env::temp_dir().join(format!("cricket-reload-{}.ch8", std::process::id()));
        std::fs::write(&path, [0x60, 0x2a]).unwrap();
        let mut cpu = CPU::default();
        cpu.load_program(&path).unwrap();
        cpu.set_rate(700);
        cpu.step().unwrap();
        let result = reload(&mut cpu, &path);
        std::fs::remove_file(&path).unwrap();
        result.unwrap();
        assert_eq!(700, cpu.rate());
        assert_eq!(0x200, cpu.pc());
    }
    #[test]
    fn missing_rom_is_an_error() {
        let mut cpu = CPU::default();
        cpu.set_rate(700);
        assert!(reload(&mut cpu, Path::new("this/rom/does/not/exist.ch8")).is_err());
        assert_eq!(700, cpu.rate());
    }
}

mod framebuffer {
    use super::*;
    #[test]
    fn copy_screen() {
        let format = FrameBufferFormat::default();
        let mut fb = FrameBuffer::default();
        let mut screen = Screen::default();
        screen.draw(0, 0, &[0x80], true);
        fb.copy_screen(&screen);
        assert_eq!(format.fg, fb.buffer()[0]);
        assert!(fb.buffer()[1..].iter().all(|&px| px == format.bg));
    }
    #[test]
    fn copy_screen_clips() {
        let format = FrameBufferFormat::default();
        let mut fb = FrameBuffer::new(8, 2);
        let mut screen = Screen::default();
        screen.draw(7, 1, &[0xc0], false);
        fb.copy_screen(&screen);
        assert_eq!(16, fb.buffer().len());
        assert_eq!(format.fg, fb.buffer()[15]);
    }
    #[test]
    fn eq() {
        assert_eq!(FrameBuffer::default(), FrameBuffer::new(64, 32));
        assert_ne!(FrameBuffer::default(), FrameBuffer::new(32, 64));
    }
}

mod games {
    use super::*;
    fn games() -> Games {
        Games::from(vec![
            PathBuf::from("games/BRIX"),
            PathBuf::from("games/PONG"),
            PathBuf::from("games/TETRIS"),
        ])
    }
    fn choose(input: &str) -> (Option<PathBuf>, String) {
        let mut output = vec![];
        let choice = games().choose(input.as_bytes(), &mut output).unwrap();
        (choice, String::from_utf8(output).unwrap())
    }
    #[test]
    fn display() {
        assert_eq!("[0] BRIX\n[1] PONG\n[2] TETRIS\n", games().to_string());
    }
    #[test]
    fn choose_valid() {
        let (choice, output) = choose("1\n");
        assert_eq!(Some(PathBuf::from("games/PONG")), choice);
        assert!(output.contains("[2] TETRIS"));
    }
    #[test]
    fn choose_quit() {
        assert_eq!(None, choose("-1\n").0);
    }
    #[test]
    fn choose_eof() {
        assert_eq!(None, choose("").0);
    }
    #[test]
    fn choose_retries() {
        let (choice, output) = choose("seven\n3\n-2\n 2 \n");
        assert_eq!(Some(PathBuf::from("games/TETRIS")), choice);
        assert_eq!(3, output.matches("Invalid index.").count());
    }
    #[test]
    fn get() {
        assert_eq!(Path::new("games/BRIX"), games().get(0).unwrap());
        assert!(matches!(
            games().get(3),
            Err(error::Error::NoSuchGame { index: 3 })
        ));
    }
    #[test]
    fn missing_directory() {
        let games = Games::new("this/directory/does/not/exist").unwrap();
        assert_eq!(Games::default(), games);
    }
    #[test]
    fn list_directory() {
        let dir = std::env::temp_dir().join(format!("cricket-games-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("subdir")).unwrap();
        std::fs::write(dir.join("b.ch8"), [0x00, 0xe0]).unwrap();
        std::fs::write(dir.join("a.ch8"), [0x00, 0xe0]).unwrap();
        let games = Games::new(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!("[0] a.ch8\n[1] b.ch8\n", games.to_string());
    }
}

mod arguments {
    use super::*;
    #[test]
    fn defaults() {
        let args = Arguments::parse_args_default::<&str>(&[]).unwrap();
        assert_eq!(None, args.file);
        assert_eq!(PathBuf::from("games"), args.games);
        assert_eq!(None, args.mode);
        assert!(!args.list && !args.mute && !args.debug && !args.pause);
    }
    #[test]
    fn everything() {
        let args = Arguments::parse_args_default(&[
            "--mode", "modern", "--rate", "700", "--frequency", "440", "--duration", "10",
            "--debug", "--pause", "--mute", "roms/pong.ch8",
        ])
        .unwrap();
        assert_eq!(Some(PathBuf::from("roms/pong.ch8")), args.file);
        assert_eq!(Some(Mode::Modern), args.mode);
        assert_eq!(Some(700), args.rate);
        assert_eq!(Some(440), args.frequency);
        assert_eq!(Some(10), args.duration);
        assert!(args.debug && args.pause && args.mute);
    }
    #[test]
    fn index_and_games() {
        let args = Arguments::parse_args_default(&["--index", "4", "--games", "roms"]).unwrap();
        assert_eq!(Some(4), args.index);
        assert_eq!(PathBuf::from("roms"), args.games);
    }
    #[test]
    fn bad_mode() {
        assert!(Arguments::parse_args_default(&["--mode", "schip"]).is_err());
    }
    #[test]
    fn beeper_from_arguments() {
        let args = Arguments::parse_args_default(&["--mute", "--duration", "5"]).unwrap();
        let beeper = beeper(&args).unwrap();
        assert!(beeper.is_running());
    }
}

mod state {
    use super::*;
    #[test]
    fn frame_period() {
        assert_eq!(16, FRAME.as_millis());
        assert!(IDLE < FRAME);
    }
}
