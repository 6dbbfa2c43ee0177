// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spoke - HID event emulator for a workbench daemon

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spoke_core::HidEvent;

use crate::client::{timeout_request, DaemonClient, DEFAULT_SERVER};

const DEFAULT_BADGE: &str = "1111111111";
const DEFAULT_BARCODE: &str = "11111111111111111111111";
const DEFAULT_RFID_SENDER: &str = "Sycreader RFID Technology Co., Ltd SYC ID&IC USB Reader";
const DEFAULT_BARCODE_SENDER: &str = "HENEX 2D Barcode Scanner";

#[derive(Parser)]
#[command(
    name = "spoke",
    version,
    about = "Emulate badge and barcode readers against a workbench daemon"
)]
struct Cli {
    /// Daemon address
    #[arg(long, global = true, default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emulate an RFID badge scan
    Rfid {
        /// Badge id
        #[arg(long, default_value = DEFAULT_BADGE)]
        string: String,
        /// Reader device name
        #[arg(long, default_value = DEFAULT_RFID_SENDER)]
        sender: String,
    },
    /// Emulate a barcode scan
    Barcode {
        /// Scanned digits
        #[arg(long, default_value = DEFAULT_BARCODE)]
        string: String,
        /// Scanner device name
        #[arg(long, default_value = DEFAULT_BARCODE_SENDER)]
        sender: String,
    },
    /// Send a HID event with any sender and payload
    Event {
        /// Device name the daemon will see
        sender: String,
        /// Raw decoded payload
        payload: String,
    },
    /// Show the last payload the daemon received
    Buffer,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::new(&cli.server, timeout_request());

    let reply = match cli.command {
        Commands::Rfid { string, sender }
        | Commands::Barcode { string, sender }
        | Commands::Event {
            sender,
            payload: string,
        } => {
            println!(
                "Sender: {}\nPayload: {}\nEndpoint: {}\n",
                sender,
                string,
                client.hid_event_url()
            );
            client.send_event(&HidEvent::new(sender, string))?
        }
        Commands::Buffer => client.hid_buffer()?,
    };

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
