/*
 *  main.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use anyhow::Context;
use env_logger::Env;
use log::{error, info};
use tokio::sync::watch;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind};

use bitx_strip::config;
use bitx_strip::display::{DisplayDriver, FrameBufferDriver, StripLayout, StripRenderer};
use bitx_strip::listener::Listener;
use bitx_strip::scheduler::{self, RenderScheduler};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[cfg(unix)]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This is {} - mixer state at a glance", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let layout = StripLayout::from_config(cfg.display.as_ref());
    let driver = FrameBufferDriver::new(layout.width, layout.height, cfg.snapshot().map(|p| p.to_path_buf()))
        .context("creating frame surface")?;
    let mut renderer = StripRenderer::new(driver, layout).context("sizing strip")?;
    renderer.init().context("initialising surface")?;

    // nothing useful happens without the feed, so a bind failure ends startup
    let listener = match Listener::bind(cfg.address(), cfg.port(), cfg.read_timeout()).await {
        Ok(l) => l,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let (handle, rx) = scheduler::channel(cfg.queue_depth());
    let (stop_tx, stop_rx) = watch::channel(false);
    let listener_task = tokio::spawn(listener.run(handle, stop_rx));

    let render = RenderScheduler::new(renderer, rx, cfg.coalesce()).run();
    tokio::pin!(render);

    let mut finished = None;
    tokio::select! {
        res = signal_handler() => {
            if let Err(e) = res {
                error!("signal handling failed: {}", e);
            }
        }
        done = &mut render => {
            finished = Some(done);
        }
    }

    info!("stopping");
    // listener exit drops the last render handle, which ends the render loop
    stop_tx.send_replace(true);
    match listener_task.await {
        Ok(stats) => info!(
            "{} commands forwarded, {} malformed lines",
            stats.forwarded, stats.parse_errors
        ),
        Err(e) => error!("listener task failed: {}", e),
    }

    let mut done = match finished {
        Some(done) => done,
        None => render.await,
    };
    DisplayDriver::clear(done.display_mut()).ok();
    info!(
        "stopped after {} redraws ({} frames presented, {}μs average frame)",
        done.stats().redraws,
        done.display().frame_count(),
        done.metrics().avg_frame_time_us
    );
    Ok(())
}
