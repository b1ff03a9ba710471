#![no_main]
#![no_std]

use panic_abort as _;
use rtic::app;

use cortex_m::peripheral::DWT;

use stm32f1xx_hal::gpio::{
    Edge as Trigger, ExtiPin, Input, Output, PullUp, PushPull, PA0, PA1, PA2, PB12,
};
use stm32f1xx_hal::pac::{TIM3, TIM4};
use stm32f1xx_hal::serial::{Config as SerialConfig, Serial};
use stm32f1xx_hal::timer::{PwmChannel, Tim3NoRemap, Tim4NoRemap, C1, C2, C3};

use rc_pwm_led::config::{self, ControllerConfig, LineId, Port, BLUE_PILL};
use rc_pwm_led::{report, ChannelId, ChannelState, Dispatcher, Edge, PinActuators, SerialConsole};

//-----------------------------------------------------------------------------

type Outputs = PinActuators<
    PB12<Output<PushPull>>,
    PwmChannel<TIM3, C1>,
    PwmChannel<TIM4, C1>,
    PwmChannel<TIM4, C2>,
    PwmChannel<TIM4, C3>,
>;

// Pin types and EXTI task bindings in this file must name the same lines as
// the board wiring.
const _: () = {
    let [power, color, brightness] = BLUE_PILL.inputs;
    assert!(matches!(power, LineId { port: Port::A, pin: 0 }));
    assert!(matches!(color, LineId { port: Port::A, pin: 1 }));
    assert!(matches!(brightness, LineId { port: Port::A, pin: 2 }));

    let out = BLUE_PILL.outputs;
    assert!(matches!(out.power, LineId { port: Port::B, pin: 12 }));
    assert!(matches!(out.brightness, LineId { port: Port::A, pin: 6 }));
    assert!(matches!(out.red, LineId { port: Port::B, pin: 6 }));
    assert!(matches!(out.green, LineId { port: Port::B, pin: 7 }));
    assert!(matches!(out.blue, LineId { port: Port::B, pin: 8 }));
};

//-----------------------------------------------------------------------------

#[app(device = stm32f1xx_hal::pac, peripherals = true)]
mod app {
    use super::*;

    #[shared]
    struct Shared {
        power: ChannelState,
        color: ChannelState,
        brightness: ChannelState,
    }

    #[local]
    struct Local {
        power_pin: PA0<Input<PullUp>>,
        color_pin: PA1<Input<PullUp>>,
        brightness_pin: PA2<Input<PullUp>>,

        dispatcher: Dispatcher,
        actuators: Outputs,
        console: SerialConsole,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        use stm32f1xx_hal::prelude::*;

        let mut core = ctx.core;
        core.DCB.enable_trace();
        core.DWT.enable_cycle_counter();

        let mut flash = ctx.device.FLASH.constrain();
        let rcc = ctx.device.RCC.constrain();
        let clocks = rcc
            .cfgr
            .use_hse(config::MCU_XTAL_HZ.Hz())
            .sysclk(config::SYSCLK_HZ.Hz())
            .pclk1(36.MHz())
            .freeze(&mut flash.acr);

        let mut afio = ctx.device.AFIO.constrain();
        let mut gpioa = ctx.device.GPIOA.split();
        let mut gpiob = ctx.device.GPIOB.split();
        let mut exti = ctx.device.EXTI;

        //---------------------------------------------------------------------

        let tx = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
        let rx = gpioa.pa10;
        let (tx, _rx) = Serial::usart1(
            ctx.device.USART1,
            (tx, rx),
            &mut afio.mapr,
            SerialConfig::default().baudrate(config::SERIAL_BAUD_RATE.bps()),
            clocks,
        )
        .split();
        let mut console = SerialConsole::init(tx, log::LevelFilter::Info);

        log::info!(
            "{} v{}, MCU {:02x?}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            stm32_device_signature::device_id()
        );

        //---------------------------------------------------------------------

        let cfg = ControllerConfig::default();
        let dispatcher = match cfg
            .ensure_wiring(&BLUE_PILL)
            .and_then(|()| Dispatcher::new(&cfg, DWT::cycle_count()))
        {
            Ok(d) => d,
            Err(e) => {
                log::error!("invalid configuration: {}", e);
                console.flush_logs();
                panic!();
            }
        };
        log::info!(
            "inputs: power {}, color {}, bright {}",
            cfg.power.input,
            cfg.color.input,
            cfg.brightness.input
        );

        //---------------------------------------------------------------------

        let mut power_pin = gpioa.pa0.into_pull_up_input(&mut gpioa.crl);
        let mut color_pin = gpioa.pa1.into_pull_up_input(&mut gpioa.crl);
        let mut brightness_pin = gpioa.pa2.into_pull_up_input(&mut gpioa.crl);

        power_pin.make_interrupt_source(&mut afio);
        power_pin.trigger_on_edge(&mut exti, Trigger::RisingFalling);
        power_pin.enable_interrupt(&mut exti);

        color_pin.make_interrupt_source(&mut afio);
        color_pin.trigger_on_edge(&mut exti, Trigger::RisingFalling);
        color_pin.enable_interrupt(&mut exti);

        brightness_pin.make_interrupt_source(&mut afio);
        brightness_pin.trigger_on_edge(&mut exti, Trigger::RisingFalling);
        brightness_pin.enable_interrupt(&mut exti);

        //---------------------------------------------------------------------

        let power_led = gpiob.pb12.into_push_pull_output(&mut gpiob.crh);

        let brightness_out = gpioa.pa6.into_alternate_push_pull(&mut gpioa.crl);
        let brightness_out = ctx
            .device
            .TIM3
            .pwm_hz::<Tim3NoRemap, _, _>(
                brightness_out,
                &mut afio.mapr,
                config::OUTPUT_PWM_FREQ_HZ.Hz(),
                &clocks,
            )
            .split();

        let rgb_pins = (
            gpiob.pb6.into_alternate_push_pull(&mut gpiob.crl),
            gpiob.pb7.into_alternate_push_pull(&mut gpiob.crl),
            gpiob.pb8.into_alternate_push_pull(&mut gpiob.crh),
        );
        let (red, green, blue) = ctx
            .device
            .TIM4
            .pwm_hz::<Tim4NoRemap, _, _>(
                rgb_pins,
                &mut afio.mapr,
                config::OUTPUT_PWM_FREQ_HZ.Hz(),
                &clocks,
            )
            .split();

        let actuators = match PinActuators::new(power_led, brightness_out, red, green, blue) {
            Ok(a) => a,
            Err(never) => match never {},
        };

        console.flush_logs();

        (
            Shared {
                power: ChannelState::for_channel(&cfg, ChannelId::Power),
                color: ChannelState::for_channel(&cfg, ChannelId::Color),
                brightness: ChannelState::for_channel(&cfg, ChannelId::Brightness),
            },
            Local {
                power_pin,
                color_pin,
                brightness_pin,
                dispatcher,
                actuators,
                console,
            },
            init::Monotonics(),
        )
    }

    //-------------------------------------------------------------------------

    #[idle(shared = [power, color, brightness], local = [dispatcher, actuators, console])]
    fn idle(ctx: idle::Context) -> ! {
        let idle::SharedResources {
            mut power,
            mut color,
            mut brightness,
            ..
        } = ctx.shared;
        let dispatcher = ctx.local.dispatcher;
        let actuators = ctx.local.actuators;
        let console = ctx.local.console;

        // snapshot + clear under the resource lock
        let mut source = |id: ChannelId| match id {
            ChannelId::Power => power.lock(ChannelState::take),
            ChannelId::Color => color.lock(ChannelState::take),
            ChannelId::Brightness => brightness.lock(ChannelState::take),
        };

        loop {
            match dispatcher.run_pass(&mut source, actuators, DWT::cycle_count()) {
                Ok(pass) => {
                    let _ = report::report(&pass, &mut *console);
                }
                Err(never) => match never {},
            }
            console.flush_logs();
        }
    }

    //-------------------------------------------------------------------------

    #[task(binds = EXTI0, shared = [power], local = [power_pin], priority = 2)]
    fn power_edge(mut ctx: power_edge::Context) {
        let now = DWT::cycle_count();
        let pin = ctx.local.power_pin;
        let edge = Edge::from_level(pin.is_high());
        pin.clear_interrupt_pending_bit();

        ctx.shared.power.lock(|ch| ch.on_edge(edge, now));
    }

    #[task(binds = EXTI1, shared = [color], local = [color_pin], priority = 2)]
    fn color_edge(mut ctx: color_edge::Context) {
        let now = DWT::cycle_count();
        let pin = ctx.local.color_pin;
        let edge = Edge::from_level(pin.is_high());
        pin.clear_interrupt_pending_bit();

        ctx.shared.color.lock(|ch| ch.on_edge(edge, now));
    }

    #[task(binds = EXTI2, shared = [brightness], local = [brightness_pin], priority = 2)]
    fn brightness_edge(mut ctx: brightness_edge::Context) {
        let now = DWT::cycle_count();
        let pin = ctx.local.brightness_pin;
        let edge = Edge::from_level(pin.is_high());
        pin.clear_interrupt_pending_bit();

        ctx.shared.brightness.lock(|ch| ch.on_edge(edge, now));
    }
}
