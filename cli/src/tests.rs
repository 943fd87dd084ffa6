#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use crate::app_config::AppConfig;
    use crate::cmd_batch::run_batch;
    use crate::cmd_list_ports::describe_range;
    use crate::controls::Controls;
    use crate::script::{parse_line, parse_script, Command, Entry};

    const TEST_SAMPLE_RATE: u32 = 8000;

    fn get_test_data_path(filename: &str) -> String {
        let mut path = PathBuf::from(file!());
        path.pop(); path.pop(); path.pop();
        path.push("test_data");
        path.push(filename);
        let abs_path = path.canonicalize().unwrap();
        return abs_path
            .to_str().unwrap()
            .to_string();
    }

    fn get_test_output_path(filename: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push("nova-tests");
        std::fs::create_dir_all(path.to_str().unwrap()).unwrap();
        path.push(filename);
        return path
            .to_str().unwrap()
            .to_string();
    }

    fn sine(n: usize) -> f32 {
        0.5 * (2.0 * std::f32::consts::PI * 200.0 * n as f32 / TEST_SAMPLE_RATE as f32).sin()
    }

    // One second of 200Hz sine.
    fn write_input_i16(path: &str) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: TEST_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for n in 0..TEST_SAMPLE_RATE as usize {
            writer.write_sample((sine(n) * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn write_input_f32(path: &str) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: TEST_SAMPLE_RATE,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for n in 0..TEST_SAMPLE_RATE as usize {
            writer.write_sample(sine(n)).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn read_output(path: &str) -> Vec<i16> {
        let reader = hound::WavReader::open(path).unwrap();
        assert_eq!(reader.spec().sample_rate, TEST_SAMPLE_RATE);
        reader.into_samples::<i16>().map(|s| s.unwrap()).collect()
    }

    fn seconds(time: f32) -> usize {
        (time * TEST_SAMPLE_RATE as f32) as usize
    }

    fn check_render(output: &[i16]) {
        assert_eq!(output.len(), TEST_SAMPLE_RATE as usize);
        // Stopped until armed, then monitoring the input while recording.
        assert!(output[..seconds(0.01)].iter().all(|&s| s == 0));
        assert!(output[seconds(0.1)..seconds(0.5)].iter().any(|&s| s != 0));
        // Playing back step 2.
        assert!(output[seconds(0.56)..seconds(0.7)].iter().any(|&s| s != 0));
        // Step 3 is muted.
        assert!(output[seconds(0.81)..seconds(0.84)].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_batch_i16() {
        let _ = env_logger::builder().is_test(true).try_init();
        let app_config = AppConfig::new(TEST_SAMPLE_RATE, 2.0);
        let script_path = get_test_data_path("record.script");
        let input_path = get_test_output_path("in.i16.wav");
        let output_path = get_test_output_path("out.i16.wav");
        write_input_i16(&input_path);

        run_batch(&app_config, &input_path, &output_path, &script_path, None, None).unwrap();

        assert!(Path::new(&output_path).exists(),
            "Output {} does not exist", output_path);
        check_render(&read_output(&output_path));
    }

    #[test]
    fn test_batch_f32_with_stems() {
        let app_config = AppConfig::new(TEST_SAMPLE_RATE, 2.0);
        let script_path = get_test_data_path("record.script");
        let input_path = get_test_output_path("in.f32.wav");
        let output_path = get_test_output_path("out.f32.wav");
        let stems_prefix = get_test_output_path("stem.f32");
        write_input_f32(&input_path);

        run_batch(&app_config, &input_path, &output_path, &script_path, Some(&stems_prefix), None).unwrap();

        check_render(&read_output(&output_path));
        for step in 1..=8 {
            let stem = format!("{}-{}.wav", stems_prefix, step);
            assert!(Path::new(&stem).exists(), "Stem {} does not exist", stem);
        }
        // Step 1 only monitors the input until the first clock.
        let stem_1 = read_output(&format!("{}-1.wav", stems_prefix));
        assert!(stem_1[seconds(0.02)..seconds(0.09)].iter().any(|&s| s != 0));
        assert!(stem_1[seconds(0.1)..].iter().all(|&s| s == 0));
        let stem_2 = read_output(&format!("{}-2.wav", stems_prefix));
        assert!(stem_2[seconds(0.1)..seconds(0.3)].iter().any(|&s| s != 0));
    }

    #[test]
    fn test_batch_duration() {
        let app_config = AppConfig::new(TEST_SAMPLE_RATE, 1.0);
        let script_path = get_test_data_path("record.script");
        let input_path = get_test_output_path("in.duration.wav");
        let output_path = get_test_output_path("out.duration.wav");
        write_input_i16(&input_path);

        run_batch(&app_config, &input_path, &output_path, &script_path, None, Some(1.5)).unwrap();
        assert_eq!(read_output(&output_path).len(), seconds(1.5));
    }

    #[test]
    fn test_batch_bad_script() {
        let app_config = AppConfig::new(TEST_SAMPLE_RATE, 1.0);
        let script_path = get_test_data_path("bad.script");
        let input_path = get_test_output_path("in.bad.wav");
        let output_path = get_test_output_path("out.bad.wav");
        write_input_i16(&input_path);

        let result = run_batch(&app_config, &input_path, &output_path, &script_path, None, None);
        let error = result.err().unwrap();
        assert!(error.message.contains("line 2"), "{}", error);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("0.5 mute 3 on").unwrap(),
                   Some(Entry { time: 0.5, command: Command::Mute(2, true) }));
        assert_eq!(parse_line("2 gain 8 0.25 # quieter").unwrap(),
                   Some(Entry { time: 2.0, command: Command::Gain(7, 0.25) }));
        assert_eq!(parse_line("1 pitch -1").unwrap(),
                   Some(Entry { time: 1.0, command: Command::Pitch(-1.0) }));
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# just a comment").unwrap(), None);

        assert!(parse_line("1.0 trigger 9").is_err());
        assert!(parse_line("1.0 trigger 0").is_err());
        assert!(parse_line("1.0 gain 1 2.0").is_err());
        assert!(parse_line("1.0 gain").is_err());
        assert!(parse_line("1.0 mute 1 maybe").is_err());
        assert!(parse_line("soon clock").is_err());
        assert!(parse_line("-1 clock").is_err());
        assert!(parse_line("1.0").is_err());
    }

    #[test]
    fn test_parse_script_sorts_by_time() {
        let script = parse_script("0.5 clock\n0.1 start\n0.5 record\n").unwrap();
        let commands: Vec<Command> = script.iter().map(|e| e.command).collect();
        assert_eq!(commands, vec!(Command::StartStop, Command::Clock, Command::Record));
    }

    #[test]
    fn test_controls_gate_pulse() {
        let mut controls = Controls::new(1000, 0.005, None);
        controls.apply(&Command::Trigger(3));
        let highs = (0..20).filter(|_| controls.next_inputs(0.0).triggers[3] > 1.0).count();
        assert_eq!(highs, 5);

        controls.apply(&Command::Reverse(1, true));
        controls.apply(&Command::Attack(0.25));
        assert!(controls.params.steps[1].reverse);
        assert_eq!(controls.params.attack, 0.25);
    }

    #[test]
    fn test_describe_range() {
        assert_eq!(describe_range(2, 44100, 48000, cpal::SampleFormat::F32, 44100),
                   "2ch F32 44100-48000Hz *");
        assert_eq!(describe_range(1, 48000, 48000, cpal::SampleFormat::I16, 44100),
                   "1ch I16 48000Hz");
        assert_eq!(describe_range(1, 8000, 192000, cpal::SampleFormat::U16, 8000),
                   "1ch U16 8000-192000Hz *");
    }

    #[test]
    fn test_controls_bpm_clock() {
        let mut controls = Controls::new(1000, 0.005, Some(60.0));
        let mut edges = 0;
        let mut previous = 0.0;
        for _ in 0..3000 {
            let clock = controls.next_inputs(0.0).clock;
            if clock > 1.0 && previous < 1.0 {
                edges += 1;
            }
            previous = clock;
        }
        assert_eq!(edges, 3);
    }
}
