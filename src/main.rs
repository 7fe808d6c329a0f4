use std::io::{self, BufRead};

use clap::{Parser, Subcommand};
use log::{info, warn};

use voltas_ir::{
    common::FanSpeed,
    voltas::{self, convert_fan, Mode, BITS, NO_REPEAT},
    parse_pulses, IrVoltas, Lines, OutputConfig, VoltasAc,
};

#[derive(Parser, Debug)]
#[command(name = "voltas", about = "Encode and decode Voltas A/C remote messages")]
struct Args {
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read raw captures from stdin, one per line, and print what they contain
    Decode {
        /// Number of bits to expect
        #[arg(long, default_value_t = BITS)]
        nbits: usize,

        /// Also accept messages with a bad checksum or an unusual length
        #[arg(long)]
        lenient: bool,

        /// Print the generic A/C state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a message and write its pulses to stdout
    Encode {
        /// Start from these hex encoded message bytes
        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        power: Option<bool>,

        #[arg(long)]
        mode: Option<Mode>,

        /// Temperature in Celsius
        #[arg(long)]
        temp: Option<u8>,

        #[arg(long)]
        fan: Option<FanSpeed>,

        #[arg(long)]
        turbo: Option<bool>,

        #[arg(long)]
        econo: Option<bool>,

        #[arg(long)]
        wifi: Option<bool>,

        #[arg(long)]
        light: Option<bool>,

        /// Number of extra copies to send
        #[arg(long, default_value_t = NO_REPEAT)]
        repeat: u16,

        /// GPIO of the IR led
        #[arg(long, default_value_t = 0)]
        pin: u16,

        #[arg(long)]
        inverted: bool,

        #[arg(long)]
        no_modulation: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Command::Decode {
            nbits,
            lenient,
            json,
        } => decode(nbits, !lenient, json),
        Command::Encode {
            state,
            power,
            mode,
            temp,
            fan,
            turbo,
            econo,
            wifi,
            light,
            repeat,
            pin,
            inverted,
            no_modulation,
        } => {
            let output = OutputConfig {
                pin,
                inverted,
                use_modulation: !no_modulation,
            };
            let mut ir = IrVoltas::new(output, Lines::new(io::stdout()));
            ir.begin()?;

            if let Some(state) = state {
                ir.set_raw_slice(&hex::decode(state)?)?;
            }
            if let Some(power) = power {
                ir.set_power(power);
            }
            if let Some(mode) = mode {
                ir.set_mode(mode);
            }
            if let Some(temp) = temp {
                if ir.set_temp(temp).was_clamped() {
                    warn!("temperature {}C is out of range, using {}C", temp, ir.temp());
                }
            }
            if let Some(fan) = fan {
                ir.set_fan(convert_fan(fan));
            }
            if let Some(turbo) = turbo {
                ir.set_turbo(turbo);
            }
            if let Some(econo) = econo {
                ir.set_econo(econo);
            }
            if let Some(wifi) = wifi {
                ir.set_wifi(wifi);
            }
            if let Some(light) = light {
                ir.set_light(light);
            }

            let raw = ir.raw();
            info!("{}: {}", hex::encode(raw), *ir);
            ir.send(repeat)?;
            Ok(())
        }
    }
}

// Read raw captures from stdin, decode them and print their contents
fn decode(nbits: usize, strict: bool, json: bool) -> anyhow::Result<()> {
    let engine = Lines::new(io::sink());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let pulses = parse_pulses(&line)?;
        let data = match voltas::phy::decode(&engine, &pulses, nbits, strict) {
            Ok(data) => data,
            Err(e) => {
                warn!("not a Voltas message: {}", e);
                continue;
            }
        };

        let mut ac = VoltasAc::new();
        if ac.set_raw_slice(&data).is_err() {
            println!("{}", hex::encode(&data));
            continue;
        }

        if json {
            println!("{}", serde_json::to_string(&ac.to_common())?);
        } else {
            println!("{}: {}", hex::encode(&data), ac);
        }
    }

    Ok(())
}
