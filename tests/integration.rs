//! Testing methods on Cricket's public API
use cricket::prelude::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

mod mem {
    use super::*;
    mod region {
        use super::*;
        #[test]
        fn copy() {
            let r1 = Charset;
            let r2 = r1;
            assert_eq!(r1, r2);
        }
        #[test]
        fn display() {
            assert_eq!("CharsetProgram", format!("{Charset}{Program}"));
        }
        #[test]
        fn debug() {
            println!("{Charset:?}{Program:?}");
        }
        #[test]
        fn ord() {
            assert!(Charset < Program);
            assert_eq!(Program, Charset.max(Program));
        }
        #[test]
        fn hash() {
            let mut hasher = DefaultHasher::new();
            Program.hash(&mut hasher);
            println!("{hasher:?}");
        }
    }
    #[test]
    fn clone_eq() {
        let mut mem = Mem::new();
        let mem2 = mem.clone();
        assert_eq!(mem, mem2);
        mem.write(0x300, 1);
        assert_ne!(mem, mem2);
    }
    #[test]
    fn fill_region() {
        let mut mem = Mem::new();
        mem.load_region(Program, &[1, 2, 3]).unwrap();
        mem.get_region_mut(Program).unwrap().fill(0);
        assert_eq!(Some(&[0, 0, 0][..]), mem.get(0x200..0x203));
        assert_eq!(Some(&cricket::cpu::mem::FONT[..]), mem.get_region(Charset));
    }
    #[test]
    fn find_missing() {
        let mem = Mem::new();
        assert_eq!(None, mem.find(&[0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(None, mem.find(&[]));
    }
}

mod cpu {
    use super::*;

    #[test]
    fn default() {
        let cpu = CPU::default();
        assert_eq!(0x200, cpu.pc());
        assert_eq!(0, cpu.i());
        assert_eq!(&[0; 16], cpu.v());
        assert!(cpu.stack().is_empty());
        assert_eq!(clock::DEFAULT_RATE, cpu.rate());
        assert_eq!(Quirks::default(), cpu.flags.quirks);
        assert!(!cpu.beeper().is_running());
    }

    #[test]
    fn new_loads_a_file() {
        let path = std::env::temp_dir().join(format!("cricket-new-{}.ch8", std::process::id()));
        std::fs::write(&path, [0x60, 0x2a]).unwrap();
        let cpu = CPU::new(&path, Beeper::default(), Flags::default());
        std::fs::remove_file(&path).unwrap();
        let mut cpu = cpu.unwrap();
        assert_eq!(Some(0x602a), cpu.mem().read_word(0x200));
        cpu.step().unwrap();
        assert_eq!(0x2a, cpu.v()[0]);
    }

    #[test]
    fn new_missing_file() {
        assert!(CPU::new("does/not/exist.ch8", Beeper::default(), Flags::default()).is_err());
    }

    #[test]
    fn with_beeper() {
        let beeper = Beeper::new(Mute, 440, std::time::Duration::from_millis(1)).unwrap();
        let cpu = CPU::with_beeper(
            beeper,
            Flags {
                quirks: Mode::Modern.into(),
                ..Default::default()
            },
        );
        assert!(cpu.beeper().is_running());
        assert_eq!(Quirks::from(false), cpu.flags.quirks);
    }

    #[test]
    fn debug() {
        println!("{:?}", CPU::default());
    }
}

mod flags {
    use super::*;
    #[test]
    fn toggles() {
        let mut flags = Flags::default();
        flags.debug();
        flags.pause();
        assert!(flags.debug && flags.pause && flags.is_stopped());
        flags.pause();
        assert!(!flags.is_stopped());
        flags.halted = true;
        assert!(flags.is_stopped());
    }
    #[test]
    fn clone_eq() {
        let flags = Flags {
            debug: true,
            ..Default::default()
        };
        assert_eq!(flags, flags.clone());
        assert_ne!(flags, Flags::default());
    }
}

mod quirks {
    use super::*;
    #[test]
    fn from_bool() {
        let on = Quirks::from(true);
        assert!(on.raw_shift_flag && on.key_debounce && on.screen_wrap && on.font_scan);
        let off = Quirks::from(false);
        assert!(!(off.raw_shift_flag || off.key_debounce || off.screen_wrap || off.font_scan));
    }
    #[test]
    fn default_is_original() {
        assert_eq!(Quirks::default(), Quirks::from(Mode::Original));
        assert_eq!(Quirks::from(false), Quirks::from(Mode::Modern));
    }
}

mod mode {
    use super::*;
    #[test]
    fn from_str() {
        assert_eq!(Mode::Original, "Original".parse().unwrap());
        assert_eq!(Mode::Modern, "MODERN".parse().unwrap());
        assert!(matches!(
            "chip48".parse::<Mode>(),
            Err(Error::InvalidMode { mode }) if mode == "chip48"
        ));
    }
}

mod screen {
    use super::*;
    #[test]
    fn dimensions() {
        let screen = Screen::default();
        assert_eq!((64, 32), (screen.width(), screen.height()));
        assert_eq!(64 * 32, screen.pixels().len());
        assert_eq!(32, screen.rows().count());
    }
    #[test]
    fn clone_eq() {
        let mut screen = Screen::default();
        let copy = screen.clone();
        screen.draw(1, 1, &[0x80], true);
        assert_ne!(screen, copy);
    }
}

mod dis {
    use super::*;
    #[test]
    fn once() {
        let dis = Dis::default();
        assert!(dis.once(0x00e0).contains("cls"));
        assert!(dis.once(0xd125).contains("draw"));
    }
}

mod error {
    use super::*;
    #[test]
    fn display() {
        assert_eq!(
            "opcode 800f not recognized",
            Error::UnknownOpcode { word: 0x800f }.to_string()
        );
        assert_eq!(
            "program is 3585 bytes, but only 3584 bytes of memory are available",
            Error::ProgramTooLarge {
                size: 0xe01,
                limit: 0xe00
            }
            .to_string()
        );
    }
}
