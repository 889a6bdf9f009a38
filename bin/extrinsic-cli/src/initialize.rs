// Copyright (C) Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.


//! Logger initialization.

use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{time::OffsetTime, SubscriberBuilder},
	EnvFilter,
};

/// Initialize logger. Timestamps are printed in the local time zone, if it is known.
pub fn initialize_logger(with_timestamp: bool) {
	let format = time::format_description::parse(
		"[year]-[month]-[day] \
		[hour repr:24]:[minute]:[second] [offset_hour sign:mandatory]",
	)
	.expect("static format string is valid");

	let local_time = OffsetTime::new(
		time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC),
		format,
	);

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::default()
			.add_directive(LevelFilter::WARN.into())
			.add_directive(
				format!("{}=info", extrinsic_service::LOG_TARGET)
					.parse()
					.expect("log target is a valid filter directive"),
			)
	});

	let builder =
		SubscriberBuilder::default().with_writer(std::io::stderr).with_env_filter(env_filter);

	if with_timestamp {
		builder.with_timer(local_time).init();
	} else {
		builder.without_time().init();
	}
}
